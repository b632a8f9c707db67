//! Connection settings for the external services.
//!
//! These are plain structs; the server binary fills them from environment
//! variables.

use std::str::FromStr;
use std::time::Duration;

/// Connection settings for a Google-Maps-compatible places/directions API.
#[derive(Debug, Clone)]
pub struct GeoApiConfig {
    /// Base URL without trailing slash (e.g. `https://maps.googleapis.com/maps/api`).
    pub base_url: String,
    /// API key appended to every request.
    pub api_key: String,
    /// Transport-level timeout for each HTTP request.
    pub request_timeout: Duration,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

/// An unrecognized backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown LLM backend type: {0}")]
pub struct UnknownBackendType(pub String);

impl FromStr for BackendType {
    type Err = UnknownBackendType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(UnknownBackendType(other.to_owned())),
        }
    }
}
