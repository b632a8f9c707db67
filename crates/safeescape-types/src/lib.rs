//! Shared type definitions for the `SafeEscape` evacuation planner.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the map frontend.
//!
//! # Modules
//!
//! - [`enums`] -- Disaster types, severities, place categories, travel modes
//! - [`structs`] -- Locations, provider payloads, candidates, routes, plans
//! - [`error`] -- Input validation errors

pub mod enums;
pub mod error;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DisasterType, PlaceCategory, PlanSource, Severity, TravelMode};
pub use error::ValidationError;
pub use structs::{
    Candidate, DisasterContext, EvacuationPlan, Location, Place, ProviderRoute, RouteOption,
    UserProfile,
};
