//! Evacuation planning HTTP API for `SafeEscape`.
//!
//! A thin Axum layer over [`EvacuationPlanner`]: request bodies are decoded
//! and validated here, planning happens in `safeescape-planner`, and planner
//! errors are mapped onto HTTP statuses (400 invalid input, 404 no safe zone,
//! 502 upstream failure).
//!
//! The router is generic over the geo provider and advisory, so tests drive
//! it with in-memory mocks and the server binary with real HTTP adapters.
//!
//! [`EvacuationPlanner`]: safeescape_planner::EvacuationPlanner

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
