//! Google-Maps-compatible geo provider.
//!
//! Implements [`GeoProvider`] over the Places Nearby Search and Directions
//! JSON APIs. Any service that speaks the same wire format (a self-hosted
//! proxy, a recorded fixture server) works by pointing `base_url` at it.
//!
//! Status handling follows the API contract: `OK` is parsed, `ZERO_RESULTS`
//! is an empty answer, and every other status is a [`ProviderError::Status`].

use safeescape_planner::{GeoProvider, ProviderError};
use safeescape_types::{Location, Place, PlaceCategory, ProviderRoute, TravelMode};
use serde::Deserialize;
use tracing::debug;

use crate::config::GeoApiConfig;

/// HTTP client for a Google-Maps-compatible API.
pub struct GoogleMapsProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleMapsProvider {
    /// Create a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &GeoApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a provider that shares an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: &GeoApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// GET `path` with query parameters and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ProviderError::Status {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("{path}: {e}")))
    }
}

impl GeoProvider for GoogleMapsProvider {
    async fn find_nearby(
        &self,
        location: Location,
        radius_meters: u32,
        category: PlaceCategory,
    ) -> Result<Vec<Place>, ProviderError> {
        let query = [
            ("location", location.to_string()),
            ("radius", radius_meters.to_string()),
            ("type", category.as_provider_type().to_owned()),
        ];
        let body: NearbySearchResponse = self.get_json("place/nearbysearch/json", &query).await?;
        let places = nearby_places(body, category)?;
        debug!(
            category = %category,
            radius_meters,
            found = places.len(),
            "nearby search complete"
        );
        Ok(places)
    }

    async fn route(
        &self,
        origin: Location,
        destination: Location,
        mode: TravelMode,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        let query = [
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.as_str().to_owned()),
            ("alternatives", "true".to_owned()),
        ];
        let body: DirectionsResponse = self.get_json("directions/json", &query).await?;
        directions_routes(body)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    geometry: Geometry,
    #[serde(default)]
    vicinity: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteResult>,
}

#[derive(Debug, Deserialize)]
struct RouteResult {
    #[serde(default)]
    legs: Vec<Leg>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Measure,
    duration: Measure,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    html_instructions: String,
}

/// Map an API status to "has results", "empty", or an error.
fn check_status(status: &str, error_message: Option<String>) -> Result<bool, ProviderError> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" => Ok(false),
        other => Err(ProviderError::Status {
            status: other.to_owned(),
            message: error_message.unwrap_or_default(),
        }),
    }
}

fn nearby_places(
    body: NearbySearchResponse,
    queried: PlaceCategory,
) -> Result<Vec<Place>, ProviderError> {
    if !check_status(&body.status, body.error_message)? {
        return Ok(Vec::new());
    }

    let places = body
        .results
        .into_iter()
        .filter_map(|result| {
            let location = Location {
                latitude: result.geometry.location.lat,
                longitude: result.geometry.location.lng,
            };
            if location.validate().is_err() {
                debug!(name = result.name, "skipping place with invalid coordinates");
                return None;
            }
            Some(Place {
                category: reported_category(&result.types, queried),
                name: result.name,
                location,
                address: result.vicinity,
            })
        })
        .collect();

    Ok(places)
}

/// Pick the most useful of a place's type tags.
///
/// The queried type wins when present. Otherwise the first tag the planner
/// recognises is used, so that a gas station returned for a `school` query
/// is still classified (and excluded) as a gas station.
fn reported_category(types: &[String], queried: PlaceCategory) -> String {
    let wanted = queried.as_provider_type();
    if types.iter().any(|t| t == wanted) {
        return wanted.to_owned();
    }
    types
        .iter()
        .find(|t| PlaceCategory::from_provider_type(t) != PlaceCategory::Other)
        .cloned()
        .unwrap_or_default()
}

fn directions_routes(body: DirectionsResponse) -> Result<Vec<ProviderRoute>, ProviderError> {
    if !check_status(&body.status, body.error_message)? {
        return Ok(Vec::new());
    }

    Ok(body
        .routes
        .into_iter()
        .map(|route| {
            let distance_meters = route.legs.iter().map(|l| l.distance.value).sum();
            let duration_seconds = route.legs.iter().map(|l| l.duration.value).sum();
            let step_instructions: Vec<String> = route
                .legs
                .iter()
                .flat_map(|l| l.steps.iter())
                .map(|s| strip_html(&s.html_instructions))
                .collect();
            ProviderRoute {
                distance_meters,
                duration_seconds,
                step_count: u32::try_from(step_instructions.len()).unwrap_or(u32::MAX),
                warnings: route.warnings,
                step_instructions,
            }
        })
        .collect())
}

/// Reduce an HTML instruction to plain text.
///
/// Tags become word breaks, the common entities are decoded, and runs of
/// whitespace collapse to one space.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NEARBY_OK: &str = r#"{
        "html_attributions": [],
        "results": [
            {
                "name": "Wankhede Stadium",
                "geometry": {"location": {"lat": 18.9389, "lng": 72.8258}},
                "vicinity": "D Road, Churchgate",
                "types": ["stadium", "point_of_interest", "establishment"]
            },
            {
                "name": "Indian Oil Petrol Pump",
                "geometry": {"location": {"lat": 18.94, "lng": 72.83}},
                "vicinity": "Marine Drive",
                "types": ["gas_station", "point_of_interest"]
            },
            {
                "name": "Broken Coordinates",
                "geometry": {"location": {"lat": 123.0, "lng": 72.83}},
                "types": ["stadium"]
            },
            {
                "name": "Unlabelled Ground",
                "geometry": {"location": {"lat": 18.95, "lng": 72.84}}
            }
        ],
        "status": "OK"
    }"#;

    const DIRECTIONS_OK: &str = r#"{
        "routes": [
            {
                "summary": "Marine Dr",
                "warnings": ["Walking directions are in beta."],
                "legs": [
                    {
                        "distance": {"text": "1.2 km", "value": 1200},
                        "duration": {"text": "15 mins", "value": 900},
                        "steps": [
                            {"html_instructions": "Head <b>north</b> on <b>Marine Dr</b>"},
                            {"html_instructions": "Take the pedestrian <b>underpass</b><div style=\"font-size:0.9em\">Destination will be on the left</div>"}
                        ]
                    },
                    {
                        "distance": {"text": "0.8 km", "value": 800},
                        "duration": {"text": "10 mins", "value": 600},
                        "steps": [
                            {"html_instructions": "Turn&nbsp;right"}
                        ]
                    }
                ]
            },
            {
                "legs": [
                    {
                        "distance": {"value": 2500},
                        "duration": {"value": 1700},
                        "steps": []
                    }
                ]
            }
        ],
        "status": "OK"
    }"#;

    #[test]
    fn nearby_results_are_parsed_and_classified() {
        let body: NearbySearchResponse = serde_json::from_str(NEARBY_OK).unwrap();
        let places = nearby_places(body, PlaceCategory::Stadium).unwrap();

        assert_eq!(places.len(), 3);
        assert_eq!(places[0].name, "Wankhede Stadium");
        assert_eq!(places[0].category, "stadium");
        assert_eq!(places[0].address, "D Road, Churchgate");
        assert_eq!(places[1].category, "gas_station");
        assert_eq!(places[2].category, "");
    }

    #[test]
    fn zero_results_is_empty() {
        let body: NearbySearchResponse =
            serde_json::from_str(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert_eq!(nearby_places(body, PlaceCategory::Park).unwrap(), Vec::new());
    }

    #[test]
    fn error_status_is_surfaced() {
        let body: NearbySearchResponse = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap();
        let result = nearby_places(body, PlaceCategory::Park);
        assert_eq!(
            result,
            Err(ProviderError::Status {
                status: "REQUEST_DENIED".to_owned(),
                message: "The provided API key is invalid.".to_owned(),
            })
        );
    }

    #[test]
    fn directions_sum_legs_and_strip_html() {
        let body: DirectionsResponse = serde_json::from_str(DIRECTIONS_OK).unwrap();
        let routes = directions_routes(body).unwrap();

        assert_eq!(routes.len(), 2);
        let first = &routes[0];
        assert!((first.distance_meters - 2000.0).abs() < f64::EPSILON);
        assert!((first.duration_seconds - 1500.0).abs() < f64::EPSILON);
        assert_eq!(first.step_count, 3);
        assert_eq!(first.warnings, vec!["Walking directions are in beta.".to_owned()]);
        assert_eq!(
            first.step_instructions,
            vec![
                "Head north on Marine Dr".to_owned(),
                "Take the pedestrian underpass Destination will be on the left".to_owned(),
                "Turn right".to_owned(),
            ]
        );
        assert_eq!(routes[1].step_count, 0);
    }

    #[test]
    fn directions_zero_results_is_empty() {
        let body: DirectionsResponse =
            serde_json::from_str(r#"{"routes": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert!(directions_routes(body).unwrap().is_empty());
    }

    #[test]
    fn directions_not_found_is_error() {
        let body: DirectionsResponse =
            serde_json::from_str(r#"{"routes": [], "status": "NOT_FOUND"}"#).unwrap();
        assert!(matches!(
            directions_routes(body),
            Err(ProviderError::Status { ref status, .. }) if status == "NOT_FOUND"
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = GeoApiConfig {
            base_url: "https://maps.example.test/maps/api/".to_owned(),
            api_key: "k".to_owned(),
            request_timeout: std::time::Duration::from_secs(1),
        };
        let provider = GoogleMapsProvider::with_client(reqwest::Client::new(), &config);
        assert_eq!(provider.base_url, "https://maps.example.test/maps/api");
    }
}
