//! Deterministic in-memory collaborators for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::Duration;

use safeescape_types::{
    DisasterContext, EvacuationPlan, Location, Place, PlaceCategory, ProviderRoute, TravelMode,
    UserProfile,
};

use crate::advisory::{AdvisoryAugmenter, AdvisoryError};
use crate::error::ProviderError;
use crate::geo::GeoProvider;

/// Long enough that any configured timeout fires first.
const FOREVER: Duration = Duration::from_secs(3600);

pub fn loc(latitude: f64, longitude: f64) -> Location {
    Location {
        latitude,
        longitude,
    }
}

pub fn place(name: &str, latitude: f64, longitude: f64, category: &str) -> Place {
    Place {
        name: name.to_owned(),
        location: loc(latitude, longitude),
        address: format!("{name} Road"),
        category: category.to_owned(),
    }
}

pub fn route(distance_meters: f64, duration_seconds: f64, step_count: u32) -> ProviderRoute {
    ProviderRoute {
        distance_meters,
        duration_seconds,
        step_count,
        warnings: Vec::new(),
        step_instructions: vec!["Head north".to_owned(); step_count as usize],
    }
}

#[derive(Default)]
pub struct MockGeo {
    places: BTreeMap<PlaceCategory, Result<Vec<Place>, ProviderError>>,
    routes: BTreeMap<String, Result<Vec<ProviderRoute>, ProviderError>>,
    slow_categories: BTreeSet<PlaceCategory>,
    pub radii: Mutex<Vec<u32>>,
    pub modes: Mutex<Vec<TravelMode>>,
}

impl MockGeo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_places(mut self, category: PlaceCategory, places: Vec<Place>) -> Self {
        self.places.insert(category, Ok(places));
        self
    }

    pub fn with_failing_category(mut self, category: PlaceCategory) -> Self {
        self.places.insert(
            category,
            Err(ProviderError::Unreachable(format!("{category} search down"))),
        );
        self
    }

    pub fn with_slow_category(mut self, category: PlaceCategory) -> Self {
        self.slow_categories.insert(category);
        self
    }

    pub fn with_route(mut self, destination: Location, route: ProviderRoute) -> Self {
        self.routes.insert(destination.to_string(), Ok(vec![route]));
        self
    }

    pub fn with_failing_route(mut self, destination: Location) -> Self {
        self.routes.insert(
            destination.to_string(),
            Err(ProviderError::Status {
                status: "NOT_FOUND".to_owned(),
                message: String::new(),
            }),
        );
        self
    }

    pub fn recorded_modes(&self) -> Vec<TravelMode> {
        self.modes.lock().unwrap().clone()
    }

    pub fn recorded_radii(&self) -> Vec<u32> {
        self.radii.lock().unwrap().clone()
    }
}

impl GeoProvider for MockGeo {
    async fn find_nearby(
        &self,
        _location: Location,
        radius_meters: u32,
        category: PlaceCategory,
    ) -> Result<Vec<Place>, ProviderError> {
        if let Ok(mut radii) = self.radii.lock() {
            radii.push(radius_meters);
        }
        if self.slow_categories.contains(&category) {
            tokio::time::sleep(FOREVER).await;
        }
        self.places
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn route(
        &self,
        _origin: Location,
        destination: Location,
        mode: TravelMode,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        if let Ok(mut modes) = self.modes.lock() {
            modes.push(mode);
        }
        self.routes
            .get(&destination.to_string())
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NoRoute))
    }
}

pub enum MockAdvisory {
    Fails,
    Hangs,
    Returns(Box<EvacuationPlan>),
}

impl AdvisoryAugmenter for MockAdvisory {
    async fn suggest_plan(
        &self,
        _location: Location,
        _disaster: DisasterContext,
        _user_profile: &UserProfile,
    ) -> Result<EvacuationPlan, AdvisoryError> {
        match self {
            Self::Fails => Err(AdvisoryError::Backend("model overloaded".to_owned())),
            Self::Hangs => {
                tokio::time::sleep(FOREVER).await;
                Err(AdvisoryError::Unavailable("never answered".to_owned()))
            }
            Self::Returns(plan) => Ok(plan.as_ref().clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
