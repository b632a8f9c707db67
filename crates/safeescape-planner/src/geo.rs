//! Geo provider interface and great-circle distance.
//!
//! The planner never talks to a maps API directly. It goes through
//! [`GeoProvider`], which concrete adapters (HTTP clients, test mocks)
//! implement.

use std::future::Future;

use safeescape_types::{Location, Place, PlaceCategory, ProviderRoute, TravelMode};

use crate::error::ProviderError;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A places-search and routing service.
///
/// Implementations must be cheap to call concurrently: the planner issues
/// one `find_nearby` per shelter category and one `route` per candidate at
/// the same time.
pub trait GeoProvider: Send + Sync {
    /// Search for places of `category` within `radius_meters` of `location`.
    fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        category: PlaceCategory,
    ) -> impl Future<Output = Result<Vec<Place>, ProviderError>> + Send;

    /// Compute one or more routes from `origin` to `destination`.
    ///
    /// The first route is treated as the provider's recommendation.
    fn route(
        &self,
        origin: Location,
        destination: Location,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, ProviderError>> + Send;
}

/// Great-circle distance between two locations in meters (haversine).
pub fn haversine_meters(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlon.mul_add(sin_dlon * lat1.cos() * lat2.cos(), sin_dlat * sin_dlat);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}
