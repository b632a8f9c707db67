//! Core data structs for evacuation planning.
//!
//! Covers the request inputs ([`Location`], [`DisasterContext`]), the raw
//! geo provider payloads ([`Place`], [`ProviderRoute`]), and the planner
//! outputs ([`Candidate`], [`RouteOption`], [`EvacuationPlan`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DisasterType, PlaceCategory, PlanSource, Severity, TravelMode};
use crate::error::ValidationError;

/// Free-form user attributes forwarded to the advisory service
/// (mobility needs, household size, language, and so on).
pub type UserProfile = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A WGS84 coordinate.
///
/// Construct through [`Location::new`] to enforce the coordinate ranges.
/// Values deserialized from untrusted input must be checked with
/// [`Location::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Degrees north, in `[-90, 90]`.
    pub latitude: f64,
    /// Degrees east, in `[-180, 180]`.
    pub longitude: f64,
}

impl Location {
    /// Create a validated location.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// Check the coordinate ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// The hazard a plan is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DisasterContext {
    /// Hazard classification.
    pub disaster_type: DisasterType,
    /// Reported severity, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl DisasterContext {
    /// A context with no severity information.
    pub const fn new(disaster_type: DisasterType) -> Self {
        Self {
            disaster_type,
            severity: None,
        }
    }

    /// Attach a severity level.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

// ---------------------------------------------------------------------------
// Geo provider payloads
// ---------------------------------------------------------------------------

/// A point of interest as returned by the geo provider's nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Place {
    /// Display name.
    pub name: String,
    /// Coordinates of the place.
    pub location: Location,
    /// Street address or vicinity, possibly empty.
    pub address: String,
    /// Provider place-type string (e.g. `fire_station`).
    pub category: String,
}

/// One route alternative as returned by the geo provider's directions call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ProviderRoute {
    /// Total route length in meters.
    pub distance_meters: f64,
    /// Estimated travel time in seconds.
    pub duration_seconds: f64,
    /// Number of navigation steps.
    pub step_count: u32,
    /// Provider warnings (ferry, toll road, walking path missing, ...).
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Plain-text instruction for each step.
    #[serde(default)]
    pub step_instructions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Planner outputs
// ---------------------------------------------------------------------------

/// A nominated safe destination before routing is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Candidate {
    /// Display name.
    pub name: String,
    /// Coordinates of the destination.
    pub location: Location,
    /// Category the destination was classified under.
    pub category: PlaceCategory,
    /// Street address or vicinity, possibly empty.
    #[serde(default)]
    pub address: String,
    /// Great-circle distance from the requester, in meters.
    pub distance_meters: f64,
    /// Small integer preference for this category under the current hazard.
    pub suitability_score: f64,
}

/// A scored, routed path from the requester to one [`Candidate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RouteOption {
    /// The destination this route leads to.
    pub candidate: Candidate,
    /// Route length in meters.
    pub distance_meters: f64,
    /// Estimated travel time in seconds.
    pub duration_seconds: f64,
    /// Number of navigation steps.
    pub step_count: u32,
    /// Mode the route was computed for.
    pub travel_mode: TravelMode,
    /// Provider warnings attached to the route.
    pub warnings: Vec<String>,
    /// Safety/efficiency score, clamped to `[0, 100]`.
    pub composite_score: f64,
}

/// The recommended route plus alternatives returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EvacuationPlan {
    /// Best route.
    pub primary_route: RouteOption,
    /// Up to two further routes, best first.
    pub alternatives: Vec<RouteOption>,
    /// Which planning path produced this plan.
    pub source: PlanSource,
    /// Human-readable guidance and degraded-mode notices.
    pub notes: Vec<String>,
}
