//! Error types for the `safeescape-planner` crate.
//!
//! [`ProviderError`] covers a single failed geo provider interaction and the
//! aggregate failures raised once every isolated unit has failed.
//! [`PlannerError`] is what the public planner API returns.

use safeescape_types::ValidationError;

/// A geo provider call failed, timed out, or returned something unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider could not be reached (connection, DNS, TLS).
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered but the payload could not be interpreted.
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status {
        /// Status code or status string reported by the provider.
        status: String,
        /// Error detail, possibly empty.
        message: String,
    },

    /// A single provider call exceeded its deadline.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// What was being called.
        operation: String,
        /// The deadline in milliseconds.
        timeout_ms: u64,
    },

    /// The routing call succeeded but returned no route.
    #[error("no route returned")]
    NoRoute,

    /// Every category query of a safe-zone search failed.
    #[error("all {attempted} category queries failed; last error: {last_error}")]
    AllCategoriesFailed {
        /// Number of category queries attempted.
        attempted: usize,
        /// Message of the last failure observed.
        last_error: String,
    },

    /// Routing failed for every candidate handed to the route scorer.
    #[error("routing failed for all {attempted} candidates; last error: {last_error}")]
    AllRoutesFailed {
        /// Number of candidates attempted.
        attempted: usize,
        /// Message of the last failure observed.
        last_error: String,
    },
}

/// Why no evacuation plan could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoSafeZoneCause {
    /// The safe-zone search completed but found nothing usable.
    #[error("no candidate safe zones found nearby")]
    NoCandidates,

    /// The geo provider failed across every isolation boundary.
    #[error(transparent)]
    Provider(ProviderError),
}

/// Errors returned by [`EvacuationPlanner`](crate::EvacuationPlanner).
///
/// `plan_evacuation` only ever returns [`Self::Validation`] or
/// [`Self::NoSafeZone`]; `find_safe_zones` returns [`Self::Validation`] or
/// [`Self::Provider`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    /// The request was rejected before any provider call.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The geo provider failed for every category of a safe-zone search.
    #[error("geo provider failure: {0}")]
    Provider(#[from] ProviderError),

    /// Neither the advisory path nor the geo fallback produced a plan.
    #[error("no safe zone available: {cause}")]
    NoSafeZone {
        /// The fallback path's failure.
        cause: NoSafeZoneCause,
    },
}
