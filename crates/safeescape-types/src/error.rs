//! Validation errors for planning inputs.
//!
//! Every planning request is checked against these rules before any
//! provider call is made.

/// A planning input was rejected before any network call was attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// A coordinate was NaN or infinite.
    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,

    /// The disaster type string did not match any known type or alias.
    #[error("unknown disaster type: {0}")]
    UnknownDisasterType(String),

    /// The severity string did not match any known level.
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
}
