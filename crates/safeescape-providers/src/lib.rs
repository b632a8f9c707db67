//! External service adapters for the `SafeEscape` evacuation planner.
//!
//! # Modules
//!
//! - [`advisory`] -- [`LlmAdvisory`], the LLM-backed advisory augmenter.
//! - [`config`] -- Connection settings for the maps API and LLM backends.
//! - [`google`] -- [`GoogleMapsProvider`], a Google-Maps-compatible
//!   [`GeoProvider`](safeescape_planner::GeoProvider).
//! - [`llm`] -- Enum-dispatched LLM backends (OpenAI-compatible, Anthropic).
//! - [`parse`] -- Tolerant parsing of model answers.
//! - [`prompt`] -- `minijinja` prompt templates.

pub mod advisory;
pub mod config;
pub mod google;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use advisory::LlmAdvisory;
pub use config::{BackendType, GeoApiConfig, LlmBackendConfig, UnknownBackendType};
pub use google::GoogleMapsProvider;
pub use llm::LlmBackend;
pub use prompt::PromptEngine;
