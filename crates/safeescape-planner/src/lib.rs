//! Safe-zone selection, route scoring, and evacuation orchestration for
//! `SafeEscape`.
//!
//! Given a requester's location and a disaster type, the planner nominates
//! structurally appropriate shelters nearby, routes to each of them, and
//! returns the best route plus alternatives. An optional advisory service is
//! consulted first; whenever it is unavailable the plan is computed from map
//! data alone.
//!
//! # Modules
//!
//! - [`advisory`] -- [`AdvisoryAugmenter`] trait, [`Unadvised`] placeholder,
//!   and [`DegradedReason`].
//! - [`config`] -- [`PlannerConfig`] and tunable [`ScoringWeights`], loaded
//!   from YAML.
//! - [`error`] -- Provider and planner error types.
//! - [`geo`] -- [`GeoProvider`] trait and haversine distance.
//! - [`orchestrator`] -- [`EvacuationPlanner`], the public entry point.
//! - [`rules`] -- Immutable per-disaster rule tables.
//! - [`safe_zone`] -- [`SafeZoneSelector`].
//! - [`scorer`] -- [`RouteScorer`] and the composite score.

pub mod advisory;
pub mod config;
pub mod error;
pub mod geo;
pub mod orchestrator;
pub mod rules;
pub mod safe_zone;
pub mod scorer;

#[cfg(test)]
mod testing;

pub use advisory::{AdvisoryAugmenter, AdvisoryError, DegradedReason, Unadvised};
pub use config::{ConfigError, PlannerConfig, ScoringWeights};
pub use error::{NoSafeZoneCause, PlannerError, ProviderError};
pub use geo::{GeoProvider, haversine_meters};
pub use orchestrator::EvacuationPlanner;
pub use safe_zone::SafeZoneSelector;
pub use scorer::{RouteScorer, score_route};
