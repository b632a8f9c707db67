//! LLM-backed advisory augmenter.
//!
//! Pipeline for one request:
//!
//! 1. Render the prompt from the request and the hazard's rule table.
//! 2. Ask the primary backend; on failure, ask the secondary backend.
//! 3. Parse the proposed destinations and guidance.
//! 4. Drop destinations whose category is unsafe for the hazard.
//! 5. Route and score the rest with the same [`RouteScorer`] the geo
//!    fallback uses, so advisory and fallback scores are comparable.
//!
//! The planner wraps the whole pipeline in its advisory deadline.

use std::collections::BTreeMap;
use std::sync::Arc;

use safeescape_planner::orchestrator::MAX_ALTERNATIVES;
use safeescape_planner::{
    AdvisoryAugmenter, AdvisoryError, GeoProvider, PlannerConfig, RouteScorer, haversine_meters,
    rules,
};
use safeescape_types::{
    Candidate, DisasterContext, EvacuationPlan, Location, PlaceCategory, PlanSource, RouteOption,
    UserProfile,
};
use tracing::{debug, info, warn};

use crate::llm::LlmBackend;
use crate::parse::{MAX_DESTINATIONS, ParsedAdvice, parse_advice};
use crate::prompt::{PromptEngine, RenderedPrompt};

/// Advisory augmenter that asks an LLM for destinations and verifies them
/// against real routes.
pub struct LlmAdvisory<G> {
    geo: Arc<G>,
    primary: LlmBackend,
    secondary: Option<LlmBackend>,
    prompts: PromptEngine,
    config: PlannerConfig,
}

impl<G: GeoProvider> LlmAdvisory<G> {
    /// Create an advisory over a primary backend and an optional secondary
    /// backend tried when the primary fails.
    pub const fn new(
        geo: Arc<G>,
        primary: LlmBackend,
        secondary: Option<LlmBackend>,
        prompts: PromptEngine,
        config: PlannerConfig,
    ) -> Self {
        Self {
            geo,
            primary,
            secondary,
            prompts,
            config,
        }
    }

    /// Primary backend first, secondary on failure.
    ///
    /// Returns the name of the backend that answered with its answer.
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<(&str, String), AdvisoryError> {
        match self.primary.complete(prompt).await {
            Ok(text) => Ok((self.primary.name(), text)),
            Err(e) => {
                let Some(secondary) = &self.secondary else {
                    return Err(e);
                };
                warn!(
                    backend = self.primary.name(),
                    error = %e,
                    "primary backend failed, trying secondary"
                );
                let text = secondary.complete(prompt).await?;
                Ok((secondary.name(), text))
            }
        }
    }

    /// Turn a model answer into a routed, scored plan.
    ///
    /// Unsafe categories are dropped before the answer is capped at
    /// [`MAX_DESTINATIONS`]. The model's reason for each planned destination
    /// follows its guidance in the notes.
    async fn plan_from_answer(
        &self,
        location: Location,
        disaster: DisasterContext,
        answer: &str,
    ) -> Result<EvacuationPlan, AdvisoryError> {
        let ParsedAdvice {
            destinations,
            guidance,
        } = parse_advice(answer)?;
        let profile = rules::profile(disaster.disaster_type);

        let mut reasons = BTreeMap::new();
        let candidates: Vec<Candidate> = destinations
            .into_iter()
            .filter_map(|d| {
                let category = PlaceCategory::from_provider_type(&d.category);
                if profile.excludes(category) {
                    warn!(
                        name = d.name,
                        category = %category,
                        "advisory proposed an unsafe destination, dropping it"
                    );
                    return None;
                }
                Some((d, category))
            })
            .take(MAX_DESTINATIONS)
            .map(|(d, category)| {
                let destination = d.location();
                if let Some(reason) = d.reason.filter(|r| !r.trim().is_empty()) {
                    reasons.insert(d.name.clone(), reason);
                }
                Candidate {
                    distance_meters: haversine_meters(location, destination),
                    suitability_score: profile.suitability(category),
                    name: d.name,
                    location: destination,
                    category,
                    address: String::new(),
                }
            })
            .collect();

        if candidates.is_empty() {
            return Err(AdvisoryError::InvalidPlan(
                "every proposed destination was unsafe for this hazard".to_owned(),
            ));
        }

        let options = RouteScorer::new(self.geo.as_ref(), &self.config)
            .score_and_rank(location, &candidates, disaster.disaster_type)
            .await?;

        let mut options = options.into_iter();
        let Some(primary_route) = options.next() else {
            return Err(AdvisoryError::InvalidPlan("no routable destination".to_owned()));
        };
        let alternatives: Vec<RouteOption> = options.take(MAX_ALTERNATIVES).collect();

        debug!(
            destinations = candidates.len(),
            guidance = guidance.len(),
            "advisory answer verified"
        );

        let mut notes = guidance;
        notes.extend(
            std::iter::once(&primary_route)
                .chain(&alternatives)
                .filter_map(|route| {
                    let name = &route.candidate.name;
                    reasons.get(name).map(|reason| format!("{name}: {reason}"))
                }),
        );

        Ok(EvacuationPlan {
            primary_route,
            alternatives,
            source: PlanSource::Advisory,
            notes,
        })
    }
}

impl<G: GeoProvider> AdvisoryAugmenter for LlmAdvisory<G> {
    async fn suggest_plan(
        &self,
        location: Location,
        disaster: DisasterContext,
        user_profile: &UserProfile,
    ) -> Result<EvacuationPlan, AdvisoryError> {
        let prompt = self.prompts.render(location, disaster, user_profile)?;
        let (backend, answer) = self.complete(&prompt).await?;
        let plan = self.plan_from_answer(location, disaster, &answer).await?;

        info!(
            backend,
            disaster = %disaster.disaster_type,
            destination = plan.primary_route.candidate.name,
            "advisory plan ready"
        );
        Ok(plan)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
