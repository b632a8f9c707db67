//! Advisory prompt rendering via `minijinja`.
//!
//! Two templates make up a prompt: `system` (role and answer format) and
//! `user` (the request). Both ship with built-in defaults; operators can
//! override either by dropping `system.j2` or `user.j2` into a template
//! directory.

use std::path::Path;

use minijinja::Environment;
use safeescape_planner::AdvisoryError;
use safeescape_planner::rules;
use safeescape_types::{DisasterContext, Location, Severity, UserProfile};

use crate::parse::MAX_DESTINATIONS;

const DEFAULT_SYSTEM: &str = "\
You are an emergency evacuation advisor. Given a person's location and an \
ongoing disaster, propose nearby destinations that are structurally safe for \
that hazard and short practical guidance.

Respond with JSON only, no prose, in exactly this shape:
{\"destinations\": [{\"name\": \"...\", \"latitude\": 0.0, \"longitude\": 0.0, \
\"category\": \"...\", \"reason\": \"...\"}], \"guidance\": [\"...\"]}

Use real places with accurate coordinates. Category must be one of the \
preferred shelter types when possible.";

const DEFAULT_USER: &str = "\
Disaster: {{ disaster_type }}{% if severity %} (severity: {{ severity }}){% endif %}
Location: {{ latitude }}, {{ longitude }}
Travel mode: {{ travel_mode }}
Preferred shelter types: {{ shelter_categories | join(\", \") }}
Never suggest: {{ avoid_categories | join(\", \") }}
{% if user_profile %}Requester profile:
{% for key, value in user_profile | items %}- {{ key }}: {{ value }}
{% endfor %}{% endif %}
Suggest up to {{ max_destinations }} destinations within {{ radius_km }} km.";

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message: role and answer format.
    pub system: String,
    /// User message: the evacuation request.
    pub user: String,
}

/// Holds the compiled advisory templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create an engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Template`] if a template fails to compile.
    pub fn new() -> Result<Self, AdvisoryError> {
        let mut env = Environment::new();
        env.add_template("system", DEFAULT_SYSTEM)
            .map_err(|e| AdvisoryError::Template(format!("failed to add system template: {e}")))?;
        env.add_template("user", DEFAULT_USER)
            .map_err(|e| AdvisoryError::Template(format!("failed to add user template: {e}")))?;
        Ok(Self { env })
    }

    /// Create an engine, overriding built-in templates with any of
    /// `system.j2` / `user.j2` found in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Template`] if an override exists but cannot
    /// be read or compiled.
    pub fn from_dir(dir: &Path) -> Result<Self, AdvisoryError> {
        let mut engine = Self::new()?;
        for name in ["system", "user"] {
            let path = dir.join(format!("{name}.j2"));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                AdvisoryError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            engine
                .env
                .add_template_owned(name, source)
                .map_err(|e| AdvisoryError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(engine)
    }

    /// Render the prompt for one evacuation request.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Template`] if rendering fails.
    pub fn render(
        &self,
        location: Location,
        disaster: DisasterContext,
        user_profile: &UserProfile,
    ) -> Result<RenderedPrompt, AdvisoryError> {
        let profile = rules::profile(disaster.disaster_type);
        let ctx = serde_json::json!({
            "disaster_type": disaster.disaster_type.as_str(),
            "severity": disaster.severity.map(Severity::as_str),
            "latitude": location.latitude,
            "longitude": location.longitude,
            "travel_mode": profile.travel_mode.as_str(),
            "shelter_categories": profile
                .categories
                .iter()
                .map(|c| c.as_provider_type())
                .collect::<Vec<_>>(),
            "avoid_categories": profile
                .excluded
                .iter()
                .map(|c| c.as_provider_type())
                .collect::<Vec<_>>(),
            "user_profile": user_profile,
            "max_destinations": MAX_DESTINATIONS,
            "radius_km": profile.radius_meters / 1000,
        });

        Ok(RenderedPrompt {
            system: self.render_one("system", &ctx)?,
            user: self.render_one("user", &ctx)?,
        })
    }

    fn render_one(&self, name: &str, ctx: &serde_json::Value) -> Result<String, AdvisoryError> {
        self.env
            .get_template(name)
            .map_err(|e| AdvisoryError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| AdvisoryError::Template(format!("{name} render failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use safeescape_types::DisasterType;

    use super::*;

    fn mumbai() -> Location {
        Location {
            latitude: 19.076,
            longitude: 72.8777,
        }
    }

    #[test]
    fn default_templates_render_request() {
        let engine = PromptEngine::new().unwrap();
        let mut profile = UserProfile::new();
        profile.insert("mobility".to_owned(), serde_json::json!("wheelchair"));

        let prompt = engine
            .render(
                mumbai(),
                DisasterContext::new(DisasterType::Flood).with_severity(Severity::High),
                &profile,
            )
            .unwrap();

        assert!(prompt.system.contains("\"destinations\""));
        assert!(prompt.user.contains("Disaster: flood (severity: high)"));
        assert!(prompt.user.contains("Travel mode: walking"));
        assert!(prompt.user.contains("Never suggest: subway_station, parking, basement"));
        assert!(prompt.user.contains("- mobility: wheelchair"));
        assert!(prompt.user.contains("within 15 km"));
    }

    #[test]
    fn empty_profile_and_severity_are_omitted() {
        let engine = PromptEngine::new().unwrap();
        let prompt = engine
            .render(
                mumbai(),
                DisasterContext::new(DisasterType::Fire),
                &UserProfile::new(),
            )
            .unwrap();

        assert!(prompt.user.starts_with("Disaster: fire\n"));
        assert!(!prompt.user.contains("Requester profile"));
    }

    #[test]
    fn directory_overrides_only_present_templates() {
        let unique = format!(
            "safeescape_prompt_test_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("system.j2"), "Custom advisor for {{ disaster_type }}.").ok();

        let engine = PromptEngine::from_dir(&dir).unwrap();
        let prompt = engine
            .render(
                mumbai(),
                DisasterContext::new(DisasterType::Earthquake),
                &UserProfile::new(),
            )
            .unwrap();

        assert_eq!(prompt.system, "Custom advisor for earthquake.");
        assert!(prompt.user.contains("Disaster: earthquake"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_directory_keeps_defaults() {
        let engine = PromptEngine::from_dir(Path::new("/nonexistent/safeescape/templates"));
        assert!(engine.is_ok());
    }
}
