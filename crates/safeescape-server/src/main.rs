//! `SafeEscape` evacuation planning server.
//!
//! Wires the Google-Maps-compatible geo provider, the optional LLM advisory,
//! and the planner into the HTTP API.
//!
//! ```text
//! HTTP --> EvacuationPlanner --> LlmAdvisory (optional, deadline-bound)
//!                           \--> SafeZoneSelector + RouteScorer (fallback)
//! ```

mod settings;

use std::sync::Arc;

use anyhow::Context;
use safeescape_api::{AppState, start_server};
use safeescape_planner::{EvacuationPlanner, PlannerConfig};
use safeescape_providers::{GoogleMapsProvider, LlmAdvisory, LlmBackend, PromptEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::settings::ServerSettings;

/// Application entry point.
///
/// Initializes logging, loads settings and planner configuration, builds the
/// providers, then serves the API until `Ctrl-C`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("safeescape-server starting");

    let settings = ServerSettings::from_env().context("loading settings")?;

    let config = match &settings.planner_config {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("loading planner config from {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    info!(
        max_results = config.max_results,
        advisory_timeout_ms = config.advisory_timeout_ms,
        geo_call_timeout_ms = config.geo_call_timeout_ms,
        "planner configuration loaded"
    );

    let geo = Arc::new(GoogleMapsProvider::new(&settings.geo).context("building maps client")?);
    info!(base_url = settings.geo.base_url, "geo provider configured");

    let advisory = match &settings.primary_backend {
        Some(primary_config) => {
            let prompts = match &settings.templates_dir {
                Some(dir) => PromptEngine::from_dir(dir)
                    .with_context(|| format!("loading prompt templates from {}", dir.display()))?,
                None => PromptEngine::new().context("loading built-in prompt templates")?,
            };
            let primary = LlmBackend::from_config(primary_config);
            info!(
                backend = primary.name(),
                model = primary_config.model,
                "primary advisory backend configured"
            );
            let secondary = settings.secondary_backend.as_ref().map(|cfg| {
                let backend = LlmBackend::from_config(cfg);
                info!(
                    backend = backend.name(),
                    model = cfg.model,
                    "secondary advisory backend configured"
                );
                backend
            });
            Some(LlmAdvisory::new(
                Arc::clone(&geo),
                primary,
                secondary,
                prompts,
                config.clone(),
            ))
        }
        None => {
            warn!("no LLM backend configured, serving geo-fallback plans only");
            None
        }
    };

    let planner = EvacuationPlanner::new(geo, config).with_optional_advisory(advisory);
    let state = Arc::new(AppState::new(planner));

    start_server(&settings.server, state)
        .await
        .context("running evacuation API")?;

    Ok(())
}
