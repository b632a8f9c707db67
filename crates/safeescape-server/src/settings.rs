//! Server settings loaded from environment variables.
//!
//! The maps API key is the only required variable. The LLM advisory is
//! enabled only when all four `LLM_DEFAULT_*` variables are set.

use std::path::PathBuf;
use std::time::Duration;

use safeescape_api::ServerConfig;
use safeescape_providers::{BackendType, GeoApiConfig, LlmBackendConfig};

/// Default Google Maps web-service base URL.
const DEFAULT_GEO_API_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default per-request HTTP timeout for the maps API.
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A required variable is unset.
    #[error("missing required env var {0}")]
    Missing(String),

    /// A variable is set but cannot be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Parse failure.
        reason: String,
    },
}

/// Complete server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Bind address.
    pub server: ServerConfig,
    /// Maps API connection.
    pub geo: GeoApiConfig,
    /// Optional planner YAML file.
    pub planner_config: Option<PathBuf>,
    /// Primary advisory backend; `None` disables the advisory.
    pub primary_backend: Option<LlmBackendConfig>,
    /// Backend tried when the primary fails.
    pub secondary_backend: Option<LlmBackendConfig>,
    /// Directory with `system.j2` / `user.j2` prompt overrides.
    pub templates_dir: Option<PathBuf>,
}

impl ServerSettings {
    /// Load settings from the process environment.
    ///
    /// Required variables:
    /// - `GEO_API_KEY` -- maps API key
    ///
    /// Optional variables:
    /// - `HOST` / `PORT` -- bind address (default `0.0.0.0:8080`)
    /// - `GEO_API_URL` -- maps API base URL
    /// - `HTTP_TIMEOUT_MS` -- maps request timeout (default 10000)
    /// - `PLANNER_CONFIG` -- path to the planner YAML file
    /// - `LLM_DEFAULT_BACKEND`, `LLM_DEFAULT_API_URL`, `LLM_DEFAULT_API_KEY`,
    ///   `LLM_DEFAULT_MODEL` -- primary advisory backend
    /// - `LLM_ESCALATION_*` -- secondary advisory backend, same fields
    /// - `ADVISORY_TEMPLATES_DIR` -- prompt template overrides
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
        };

        let api_key = lookup("GEO_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SettingsError::Missing("GEO_API_KEY".to_owned()))?;
        let geo = GeoApiConfig {
            base_url: lookup("GEO_API_URL").unwrap_or_else(|| DEFAULT_GEO_API_URL.to_owned()),
            api_key,
            request_timeout: Duration::from_millis(parse_or(
                &lookup,
                "HTTP_TIMEOUT_MS",
                DEFAULT_HTTP_TIMEOUT_MS,
            )?),
        };

        Ok(Self {
            server,
            geo,
            planner_config: lookup("PLANNER_CONFIG").map(PathBuf::from),
            primary_backend: backend_config(&lookup, "LLM_DEFAULT")?,
            secondary_backend: backend_config(&lookup, "LLM_ESCALATION")?,
            templates_dir: lookup("ADVISORY_TEMPLATES_DIR").map(PathBuf::from),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e: T::Err| SettingsError::Invalid {
            name: name.to_owned(),
            reason: e.to_string(),
        })
    })
}

/// Load a backend from `{prefix}_BACKEND`, `_API_URL`, `_API_KEY`, `_MODEL`.
///
/// Returns `None` when any of the four is unset; an unknown backend type is
/// an error.
fn backend_config(
    lookup: &impl Fn(&str) -> Option<String>,
    prefix: &str,
) -> Result<Option<LlmBackendConfig>, SettingsError> {
    let (Some(backend), Some(api_url), Some(api_key), Some(model)) = (
        lookup(&format!("{prefix}_BACKEND")),
        lookup(&format!("{prefix}_API_URL")),
        lookup(&format!("{prefix}_API_KEY")),
        lookup(&format!("{prefix}_MODEL")),
    ) else {
        return Ok(None);
    };

    let backend_type: BackendType = backend.parse().map_err(|e| SettingsError::Invalid {
        name: format!("{prefix}_BACKEND"),
        reason: format!("{e}"),
    })?;

    Ok(Some(LlmBackendConfig {
        backend_type,
        api_url,
        api_key,
        model,
    }))
}
