//! Advisory augmenter boundary.
//!
//! The advisory service is best-effort. Whatever goes wrong inside it
//! (timeout, transport error, unparseable answer, nonsensical plan) is
//! reduced to a [`DegradedReason`] before the geo fallback runs, so the
//! fallback path never sees the advisory's own error types.

use std::future::Future;

use safeescape_types::{DisasterContext, EvacuationPlan, Location, UserProfile};

use crate::error::ProviderError;

/// Failures inside an advisory implementation.
///
/// The planner treats every variant identically: as "advisory unavailable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    /// The service is not configured or refused the request.
    #[error("advisory unavailable: {0}")]
    Unavailable(String),

    /// The backend returned an error or could not be reached.
    #[error("advisory backend error: {0}")]
    Backend(String),

    /// The backend's answer could not be parsed.
    #[error("advisory response parse error: {0}")]
    Parse(String),

    /// A prompt template failed to load or render.
    #[error("advisory template error: {0}")]
    Template(String),

    /// A geo provider call made on behalf of the advisory failed.
    #[error("advisory geo lookup failed: {0}")]
    Provider(#[from] ProviderError),

    /// The produced plan violates a data-model invariant.
    #[error("advisory plan rejected: {0}")]
    InvalidPlan(String),
}

/// A generative reasoning service that proposes evacuation plans.
pub trait AdvisoryAugmenter: Send + Sync {
    /// Propose a plan for the requester.
    ///
    /// The returned plan's `source` is overwritten by the planner.
    fn suggest_plan(
        &self,
        location: Location,
        disaster: DisasterContext,
        user_profile: &UserProfile,
    ) -> impl Future<Output = Result<EvacuationPlan, AdvisoryError>> + Send;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "advisory"
    }
}

/// Placeholder advisory type for planners built without one.
///
/// Never called: a planner without an advisory goes straight to the geo
/// fallback with [`DegradedReason::Disabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unadvised;

impl AdvisoryAugmenter for Unadvised {
    async fn suggest_plan(
        &self,
        _location: Location,
        _disaster: DisasterContext,
        _user_profile: &UserProfile,
    ) -> Result<EvacuationPlan, AdvisoryError> {
        Err(AdvisoryError::Unavailable("no advisory configured".to_owned()))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Why the planner fell back to the geo-only path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    /// The advisory did not answer within its deadline.
    Timeout,
    /// The advisory answered with an error or an unusable plan.
    Failed,
    /// No advisory is configured.
    Disabled,
}

impl DegradedReason {
    /// Lowercase name for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Failed => "failed",
            Self::Disabled => "disabled",
        }
    }

    /// Note attached to fallback plans.
    pub const fn note(self) -> &'static str {
        match self {
            Self::Timeout => {
                "Advisory guidance timed out; this route was computed from map data only."
            }
            Self::Failed => {
                "Advisory guidance is unavailable; this route was computed from map data only."
            }
            Self::Disabled => "This route was computed from map data only.",
        }
    }
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
