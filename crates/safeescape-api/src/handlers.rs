//! Endpoint handlers for the evacuation API.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/api/evacuation/plan` | Plan an evacuation route |
//! | `POST` | `/api/evacuation/safe-zones` | Rank nearby safe zones |
//!
//! Disaster type and severity arrive as strings and are parsed here, so an
//! unknown value is a 400 with a readable message instead of a generic body
//! rejection.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use safeescape_planner::{AdvisoryAugmenter, GeoProvider};
use safeescape_types::{
    Candidate, DisasterContext, DisasterType, EvacuationPlan, Location, Severity, UserProfile,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/evacuation/plan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Requester position.
    pub location: Location,
    /// Disaster type name or alias (e.g. `flood`, `wildfire`).
    pub disaster_type: String,
    /// Optional severity (`low`, `medium`, `high`, `extreme`).
    #[serde(default)]
    pub severity: Option<String>,
    /// Optional free-form attributes forwarded to the advisory.
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

/// Body of `POST /api/evacuation/safe-zones`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZonesRequest {
    /// Requester position.
    pub location: Location,
    /// Disaster type name or alias.
    pub disaster_type: String,
    /// Optional severity.
    #[serde(default)]
    pub severity: Option<String>,
    /// How many zones to return; the configured default when absent.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Response of `POST /api/evacuation/safe-zones`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZonesResponse {
    /// Ranked safe zones, best first.
    pub safe_zones: Vec<Candidate>,
}

/// Parse the disaster fields of a request.
fn disaster_context(
    disaster_type: &str,
    severity: Option<&str>,
) -> Result<DisasterContext, ValidationError> {
    let context = DisasterContext::new(disaster_type.parse::<DisasterType>()?);
    match severity {
        Some(s) => Ok(context.with_severity(s.parse::<Severity>()?)),
        None => Ok(context),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /api/evacuation/plan`.
pub async fn plan_evacuation<G, A>(
    State(state): State<Arc<AppState<G, A>>>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<EvacuationPlan>, ApiError>
where
    G: GeoProvider,
    A: AdvisoryAugmenter,
{
    let Json(request) = payload?;
    let disaster = disaster_context(&request.disaster_type, request.severity.as_deref())?;

    let plan = state
        .planner
        .plan_evacuation(request.location, disaster, request.user_profile.as_ref())
        .await?;

    info!(
        disaster = %disaster.disaster_type,
        source = ?plan.source,
        destination = plan.primary_route.candidate.name,
        "evacuation plan served"
    );
    Ok(Json(plan))
}

/// `POST /api/evacuation/safe-zones`.
pub async fn find_safe_zones<G, A>(
    State(state): State<Arc<AppState<G, A>>>,
    payload: Result<Json<SafeZonesRequest>, JsonRejection>,
) -> Result<Json<SafeZonesResponse>, ApiError>
where
    G: GeoProvider,
    A: AdvisoryAugmenter,
{
    let Json(request) = payload?;
    let disaster = disaster_context(&request.disaster_type, request.severity.as_deref())?;

    let safe_zones = state
        .planner
        .find_safe_zones(request.location, disaster, request.max_results.unwrap_or(0))
        .await?;

    info!(
        disaster = %disaster.disaster_type,
        found = safe_zones.len(),
        "safe zones served"
    );
    Ok(Json(SafeZonesResponse { safe_zones }))
}
