//! Safe-zone selection.
//!
//! Picks shelter categories and a search radius for the hazard, queries the
//! geo provider for every category concurrently, drops structurally unsafe
//! places, and ranks what remains by suitability, then distance.
//!
//! A category whose query fails or times out contributes nothing; the search
//! as a whole only fails when every category failed.

use std::collections::BTreeSet;

use futures::future::join_all;
use safeescape_types::{Candidate, DisasterContext, Location, Place, PlaceCategory};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::ProviderError;
use crate::geo::{GeoProvider, haversine_meters};
use crate::rules::{self, DisasterProfile};

/// Finds and ranks safe-zone candidates around a location.
pub struct SafeZoneSelector<'a, G> {
    geo: &'a G,
    config: &'a PlannerConfig,
}

impl<'a, G: GeoProvider> SafeZoneSelector<'a, G> {
    /// Create a selector over a geo provider.
    pub const fn new(geo: &'a G, config: &'a PlannerConfig) -> Self {
        Self { geo, config }
    }

    /// Find up to `max_results` candidates, best first.
    ///
    /// `max_results == 0` means the configured default. An empty result is
    /// not an error: it means every reachable category came back empty or
    /// fully excluded.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AllCategoriesFailed`] when no category query
    /// succeeded.
    pub async fn find_candidates(
        &self,
        location: Location,
        disaster: DisasterContext,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let profile = rules::profile(disaster.disaster_type);
        let radius = self.config.clamp_radius(profile.radius_meters);
        let limit = if max_results == 0 {
            self.config.max_results
        } else {
            max_results
        };

        debug!(
            disaster = %disaster.disaster_type,
            radius_meters = radius,
            categories = profile.categories.len(),
            "searching for safe zones"
        );

        let queries = profile
            .categories
            .iter()
            .map(|&category| self.query_category(location, radius, category));
        let outcomes = join_all(queries).await;

        let mut last_error = None;
        let mut succeeded = 0_usize;
        let mut places = Vec::new();
        for (&category, outcome) in profile.categories.iter().zip(outcomes) {
            match outcome {
                Ok(found) => {
                    succeeded = succeeded.saturating_add(1);
                    places.extend(found.into_iter().map(|p| (category, p)));
                }
                Err(e) => {
                    warn!(
                        category = %category,
                        error = %e,
                        "category query failed, treating as empty"
                    );
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0
            && let Some(e) = last_error
        {
            return Err(ProviderError::AllCategoriesFailed {
                attempted: profile.categories.len(),
                last_error: e.to_string(),
            });
        }

        let mut candidates = build_candidates(location, profile, places);
        rank(&mut candidates);
        candidates.truncate(limit);

        debug!(
            disaster = %disaster.disaster_type,
            found = candidates.len(),
            "safe-zone search complete"
        );

        Ok(candidates)
    }

    /// One category query under the per-call deadline.
    async fn query_category(
        &self,
        location: Location,
        radius_meters: u32,
        category: PlaceCategory,
    ) -> Result<Vec<Place>, ProviderError> {
        let deadline = self.config.geo_call_timeout();
        timeout(deadline, self.geo.find_nearby(location, radius_meters, category))
            .await
            .unwrap_or_else(|_elapsed| {
                Err(ProviderError::Timeout {
                    operation: format!("find_nearby({category})"),
                    timeout_ms: self.config.geo_call_timeout_ms,
                })
            })
    }
}

/// Turn raw places into candidates, dropping duplicates and excluded
/// categories.
///
/// A place keeps the category the provider reported when it is one the
/// planner recognises; otherwise it inherits the category it was searched
/// under.
fn build_candidates(
    origin: Location,
    profile: &DisasterProfile,
    places: Vec<(PlaceCategory, Place)>,
) -> Vec<Candidate> {
    let mut seen = BTreeSet::new();
    let mut candidates = Vec::with_capacity(places.len());

    for (queried, place) in places {
        if !seen.insert(format!("{}|{}", place.name, place.location)) {
            continue;
        }

        let reported = PlaceCategory::from_provider_type(&place.category);
        let category = if reported == PlaceCategory::Other {
            queried
        } else {
            reported
        };

        if profile.excludes(category) {
            debug!(
                name = place.name,
                category = %category,
                "excluding structurally unsafe place"
            );
            continue;
        }

        candidates.push(Candidate {
            distance_meters: haversine_meters(origin, place.location),
            suitability_score: profile.suitability(category),
            name: place.name,
            location: place.location,
            category,
            address: place.address,
        });
    }

    candidates
}

/// Sort by suitability descending, then distance ascending. Stable.
fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.suitability_score
            .total_cmp(&a.suitability_score)
            .then_with(|| a.distance_meters.total_cmp(&b.distance_meters))
    });
}
