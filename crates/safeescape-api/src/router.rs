//! Axum router construction for the evacuation API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use safeescape_planner::{AdvisoryAugmenter, GeoProvider};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// - `GET /health` -- liveness probe
/// - `POST /api/evacuation/plan` -- evacuation plan for one requester
/// - `POST /api/evacuation/safe-zones` -- ranked safe zones, unrouted
pub fn build_router<G, A>(state: Arc<AppState<G, A>>) -> Router
where
    G: GeoProvider + 'static,
    A: AdvisoryAugmenter + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/evacuation/plan", post(handlers::plan_evacuation::<G, A>))
        .route(
            "/api/evacuation/safe-zones",
            post(handlers::find_safe_zones::<G, A>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
