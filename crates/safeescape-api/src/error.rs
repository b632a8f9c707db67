//! Error types for the evacuation API.
//!
//! [`ApiError`] maps planner failures onto HTTP statuses and renders them as
//! `{"error": ..., "status": ...}` via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use safeescape_planner::PlannerError;
use safeescape_types::ValidationError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be decoded.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// A request field failed validation.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// No safe zone could be found or reached.
    #[error("{0}")]
    NoSafeZone(String),

    /// The upstream geo provider failed.
    #[error("upstream provider failure: {0}")]
    Provider(String),
}

impl From<PlannerError> for ApiError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::Validation(v) => Self::Validation(v),
            PlannerError::NoSafeZone { .. } => Self::NoSafeZone(e.to_string()),
            PlannerError::Provider(p) => Self::Provider(p.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NoSafeZone(_) => StatusCode::NOT_FOUND,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use safeescape_planner::{NoSafeZoneCause, ProviderError};

    use super::*;

    #[test]
    fn planner_errors_map_to_statuses() {
        let validation: ApiError =
            PlannerError::Validation(ValidationError::LatitudeOutOfRange(91.0)).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let none: ApiError = PlannerError::NoSafeZone {
            cause: NoSafeZoneCause::NoCandidates,
        }
        .into();
        assert_eq!(none.status(), StatusCode::NOT_FOUND);

        let upstream: ApiError = PlannerError::Provider(ProviderError::AllCategoriesFailed {
            attempted: 4,
            last_error: "timeout".to_owned(),
        })
        .into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
