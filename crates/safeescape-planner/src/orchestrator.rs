//! Evacuation planning orchestrator.
//!
//! `plan_evacuation` runs two paths in order:
//!
//! 1. **Advisory**: ask the configured [`AdvisoryAugmenter`] for a plan under
//!    a deadline. A usable answer is normalized and returned as-is.
//! 2. **Geo fallback**: on any advisory failure (or no advisory at all), run
//!    the [`SafeZoneSelector`] and [`RouteScorer`] and build the plan from
//!    map data only.
//!
//! The only thing that crosses from the first path to the second is a
//! [`DegradedReason`], which becomes a note on the returned plan.

use std::sync::Arc;

use safeescape_types::{
    Candidate, DisasterContext, EvacuationPlan, Location, PlanSource, RouteOption, UserProfile,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::advisory::{AdvisoryAugmenter, AdvisoryError, DegradedReason, Unadvised};
use crate::config::PlannerConfig;
use crate::error::{NoSafeZoneCause, PlannerError};
use crate::geo::GeoProvider;
use crate::rules;
use crate::safe_zone::SafeZoneSelector;
use crate::scorer::RouteScorer;

/// Number of alternatives returned next to the primary route.
pub const MAX_ALTERNATIVES: usize = 2;

/// Plans evacuations for individual requesters.
///
/// Read-only after construction; share it across requests behind an `Arc`.
pub struct EvacuationPlanner<G, A = Unadvised> {
    geo: Arc<G>,
    advisory: Option<A>,
    config: PlannerConfig,
}

impl<G: GeoProvider> EvacuationPlanner<G, Unadvised> {
    /// Create a planner that only uses the geo fallback.
    pub const fn new(geo: Arc<G>, config: PlannerConfig) -> Self {
        Self {
            geo,
            advisory: None,
            config,
        }
    }
}

impl<G, A> EvacuationPlanner<G, A> {
    /// Attach an advisory augmenter, replacing any existing one.
    pub fn with_advisory<B: AdvisoryAugmenter>(self, advisory: B) -> EvacuationPlanner<G, B> {
        self.with_optional_advisory(Some(advisory))
    }

    /// Attach an advisory augmenter if one is configured.
    pub fn with_optional_advisory<B: AdvisoryAugmenter>(
        self,
        advisory: Option<B>,
    ) -> EvacuationPlanner<G, B> {
        EvacuationPlanner {
            geo: self.geo,
            advisory,
            config: self.config,
        }
    }
}

impl<G: GeoProvider, A: AdvisoryAugmenter> EvacuationPlanner<G, A> {
    /// Produce an evacuation plan for a requester.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Validation`] for an invalid location (before
    /// any provider call) and [`PlannerError::NoSafeZone`] when the geo
    /// fallback finds nothing routable.
    pub async fn plan_evacuation(
        &self,
        location: Location,
        disaster: DisasterContext,
        user_profile: Option<&UserProfile>,
    ) -> Result<EvacuationPlan, PlannerError> {
        location.validate()?;

        let reason = match self.advise(location, disaster, user_profile).await {
            Ok(plan) => return Ok(plan),
            Err(reason) => reason,
        };

        self.geo_fallback(location, disaster, reason).await
    }

    /// Rank safe zones around a location without routing them.
    ///
    /// `max_results == 0` means the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Validation`] for an invalid location and
    /// [`PlannerError::Provider`] when every category query failed.
    pub async fn find_safe_zones(
        &self,
        location: Location,
        disaster: DisasterContext,
        max_results: usize,
    ) -> Result<Vec<Candidate>, PlannerError> {
        location.validate()?;

        let selector = SafeZoneSelector::new(self.geo.as_ref(), &self.config);
        Ok(selector
            .find_candidates(location, disaster, max_results)
            .await?)
    }

    /// Advisory path. Every failure collapses into a [`DegradedReason`].
    async fn advise(
        &self,
        location: Location,
        disaster: DisasterContext,
        user_profile: Option<&UserProfile>,
    ) -> Result<EvacuationPlan, DegradedReason> {
        let Some(advisory) = &self.advisory else {
            debug!("no advisory configured, using geo fallback");
            return Err(DegradedReason::Disabled);
        };

        let empty = UserProfile::new();
        let profile = user_profile.unwrap_or(&empty);
        let deadline = self.config.advisory_timeout();

        match timeout(deadline, advisory.suggest_plan(location, disaster, profile)).await {
            Ok(Ok(plan)) => match normalize_advisory_plan(plan, disaster) {
                Ok(plan) => {
                    info!(
                        advisory = advisory.name(),
                        disaster = %disaster.disaster_type,
                        destination = plan.primary_route.candidate.name,
                        "plan produced by advisory"
                    );
                    Ok(plan)
                }
                Err(e) => {
                    warn!(
                        advisory = advisory.name(),
                        error = %e,
                        "advisory plan rejected, using geo fallback"
                    );
                    Err(DegradedReason::Failed)
                }
            },
            Ok(Err(e)) => {
                warn!(
                    advisory = advisory.name(),
                    error = %e,
                    "advisory failed, using geo fallback"
                );
                Err(DegradedReason::Failed)
            }
            Err(_) => {
                warn!(
                    advisory = advisory.name(),
                    timeout_ms = self.config.advisory_timeout_ms,
                    "advisory deadline exceeded, using geo fallback"
                );
                Err(DegradedReason::Timeout)
            }
        }
    }

    /// Geo-only path: select, route, score.
    async fn geo_fallback(
        &self,
        location: Location,
        disaster: DisasterContext,
        reason: DegradedReason,
    ) -> Result<EvacuationPlan, PlannerError> {
        let geo = self.geo.as_ref();

        let candidates = SafeZoneSelector::new(geo, &self.config)
            .find_candidates(location, disaster, self.config.max_results)
            .await
            .map_err(|e| PlannerError::NoSafeZone {
                cause: NoSafeZoneCause::Provider(e),
            })?;

        if candidates.is_empty() {
            return Err(PlannerError::NoSafeZone {
                cause: NoSafeZoneCause::NoCandidates,
            });
        }

        let options = RouteScorer::new(geo, &self.config)
            .score_and_rank(location, &candidates, disaster.disaster_type)
            .await
            .map_err(|e| PlannerError::NoSafeZone {
                cause: NoSafeZoneCause::Provider(e),
            })?;

        let mut options = options.into_iter();
        let Some(primary_route) = options.next() else {
            return Err(PlannerError::NoSafeZone {
                cause: NoSafeZoneCause::NoCandidates,
            });
        };
        let alternatives: Vec<RouteOption> = options.take(MAX_ALTERNATIVES).collect();

        let mut notes = vec![reason.note().to_owned()];
        if let Some(severity) = disaster.severity
            && severity.is_urgent()
        {
            notes.push(format!(
                "Severity is {severity}: leave immediately and follow official instructions."
            ));
        }

        info!(
            disaster = %disaster.disaster_type,
            degraded = reason.as_str(),
            destination = primary_route.candidate.name,
            score = primary_route.composite_score,
            alternatives = alternatives.len(),
            "plan produced by geo fallback"
        );

        Ok(EvacuationPlan {
            primary_route,
            alternatives,
            source: PlanSource::GeoFallback,
            notes,
        })
    }
}

/// Bring an advisory plan in line with the data-model invariants.
///
/// Routes to a category excluded for the hazard are dropped; if that
/// removes the primary route, the best-scoring alternative takes its place.
/// Scores are clamped, alternatives re-sorted best first and capped.
/// Non-finite numbers or invalid coordinates reject the plan outright.
fn normalize_advisory_plan(
    plan: EvacuationPlan,
    disaster: DisasterContext,
) -> Result<EvacuationPlan, AdvisoryError> {
    let profile = rules::profile(disaster.disaster_type);
    let EvacuationPlan {
        primary_route,
        alternatives,
        notes,
        ..
    } = plan;

    let keep = |mut route: RouteOption| -> Result<Option<RouteOption>, AdvisoryError> {
        if profile.excludes(route.candidate.category) {
            warn!(
                destination = route.candidate.name,
                category = %route.candidate.category,
                disaster = %disaster.disaster_type,
                "advisory proposed an excluded destination, dropping it"
            );
            return Ok(None);
        }
        normalize_route(&mut route)?;
        Ok(Some(route))
    };

    let primary = keep(primary_route)?;
    let mut alternatives = alternatives
        .into_iter()
        .map(keep)
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;
    alternatives.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

    let primary_route = match primary {
        Some(route) => route,
        None if alternatives.is_empty() => {
            return Err(AdvisoryError::InvalidPlan(format!(
                "every destination is excluded for {}",
                disaster.disaster_type
            )));
        }
        None => alternatives.remove(0),
    };
    alternatives.truncate(MAX_ALTERNATIVES);

    Ok(EvacuationPlan {
        primary_route,
        alternatives,
        source: PlanSource::Advisory,
        notes,
    })
}

fn normalize_route(route: &mut RouteOption) -> Result<(), AdvisoryError> {
    route
        .candidate
        .location
        .validate()
        .map_err(|e| AdvisoryError::InvalidPlan(format!("{}: {e}", route.candidate.name)))?;

    let numbers = [
        route.composite_score,
        route.distance_meters,
        route.duration_seconds,
    ];
    if numbers.iter().any(|n| !n.is_finite()) {
        return Err(AdvisoryError::InvalidPlan(format!(
            "{}: non-finite route metrics",
            route.candidate.name
        )));
    }

    route.composite_score = route.composite_score.clamp(0.0, 100.0);
    Ok(())
}
