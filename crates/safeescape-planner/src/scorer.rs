//! Route scoring and ranking.
//!
//! Every candidate is routed concurrently with the hazard's travel mode. The
//! provider's first route for each destination is scored with the composite
//! formula in [`ScoringWeights`]; candidates whose routing fails are dropped.

use futures::future::join_all;
use safeescape_types::{
    Candidate, DisasterType, Location, PlaceCategory, ProviderRoute, RouteOption, TravelMode,
};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{PlannerConfig, ScoringWeights};
use crate::error::ProviderError;
use crate::geo::GeoProvider;
use crate::rules::{self, DisasterProfile};

/// Routes candidates and ranks them by composite score.
pub struct RouteScorer<'a, G> {
    geo: &'a G,
    config: &'a PlannerConfig,
}

impl<'a, G: GeoProvider> RouteScorer<'a, G> {
    /// Create a scorer over a geo provider.
    pub const fn new(geo: &'a G, config: &'a PlannerConfig) -> Self {
        Self { geo, config }
    }

    /// Route every candidate and return the scored options, best first.
    ///
    /// Ties on score are broken by shorter travel time; remaining ties keep
    /// candidate order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::AllRoutesFailed`] if `candidates` is empty or
    /// no candidate could be routed.
    pub async fn score_and_rank(
        &self,
        origin: Location,
        candidates: &[Candidate],
        disaster_type: DisasterType,
    ) -> Result<Vec<RouteOption>, ProviderError> {
        if candidates.is_empty() {
            return Err(ProviderError::AllRoutesFailed {
                attempted: 0,
                last_error: "no candidates to route".to_owned(),
            });
        }

        let profile = rules::profile(disaster_type);
        let mode = profile.travel_mode;

        let lookups = candidates
            .iter()
            .map(|candidate| self.first_route(origin, candidate.location, mode));
        let outcomes = join_all(lookups).await;

        let mut last_error = None;
        let mut options = Vec::with_capacity(candidates.len());
        for (candidate, outcome) in candidates.iter().zip(outcomes) {
            match outcome {
                Ok(route) => {
                    let composite_score =
                        score_route(&route, candidate.category, profile, &self.config.scoring);
                    options.push(RouteOption {
                        candidate: candidate.clone(),
                        distance_meters: route.distance_meters,
                        duration_seconds: route.duration_seconds,
                        step_count: route.step_count,
                        travel_mode: mode,
                        warnings: route.warnings,
                        composite_score,
                    });
                }
                Err(e) => {
                    warn!(
                        destination = candidate.name,
                        error = %e,
                        "routing failed, dropping candidate"
                    );
                    last_error = Some(e);
                }
            }
        }

        if options.is_empty() {
            return Err(ProviderError::AllRoutesFailed {
                attempted: candidates.len(),
                last_error: last_error.map_or_else(String::new, |e| e.to_string()),
            });
        }

        options.sort_by(|a, b| {
            b.composite_score
                .total_cmp(&a.composite_score)
                .then_with(|| a.duration_seconds.total_cmp(&b.duration_seconds))
        });

        debug!(
            disaster = %disaster_type,
            mode = mode.as_str(),
            routed = options.len(),
            attempted = candidates.len(),
            "routes scored"
        );

        Ok(options)
    }

    /// The provider's recommended route under the per-call deadline.
    async fn first_route(
        &self,
        origin: Location,
        destination: Location,
        mode: TravelMode,
    ) -> Result<ProviderRoute, ProviderError> {
        let routes = timeout(
            self.config.geo_call_timeout(),
            self.geo.route(origin, destination, mode),
        )
        .await
        .unwrap_or_else(|_elapsed| {
            Err(ProviderError::Timeout {
                operation: format!("route(-> {destination})"),
                timeout_ms: self.config.geo_call_timeout_ms,
            })
        })?;
        routes.into_iter().next().ok_or(ProviderError::NoRoute)
    }
}

/// Composite score of one route to a destination of `category`.
///
/// Pure function of its inputs; clamped to `[0, 100]`.
pub fn score_route(
    route: &ProviderRoute,
    category: PlaceCategory,
    profile: &DisasterProfile,
    weights: &ScoringWeights,
) -> f64 {
    let duration_penalty = (route.duration_seconds.max(0.0) / weights.seconds_per_duration_point)
        .min(weights.duration_penalty_cap);
    let distance_penalty = (route.distance_meters.max(0.0) / weights.meters_per_distance_point)
        .min(weights.distance_penalty_cap);
    let step_penalty = f64::from(route.step_count).min(weights.step_penalty_cap);
    let warning_penalty = weights.warning_penalty * count_as_f64(route.warnings.len());
    let hazard_penalty =
        weights.hazard_penalty_scale * profile.hazard_penalty(route.step_instructions.as_slice());
    let bonus = weights.destination_bonus_scale * profile.destination_bonus(category);

    let score = weights.base_score
        - duration_penalty
        - distance_penalty
        - step_penalty
        - warning_penalty
        - hazard_penalty
        + bonus;

    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn count_as_f64(n: usize) -> f64 {
    u32::try_from(n).map_or_else(|_| f64::from(u32::MAX), f64::from)
}
