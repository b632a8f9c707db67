//! Chat-completion backends for the advisory.
//!
//! One [`LlmBackend`] value per configured endpoint. The wire dialect
//! (OpenAI-compatible or Anthropic Messages) only changes the request shape
//! and where the answer text sits in the response; transport and error
//! handling are shared.

use safeescape_planner::AdvisoryError;

use crate::config::{BackendType, LlmBackendConfig};
use crate::prompt::RenderedPrompt;

/// Upper bound on the answer length requested from the model.
const MAX_TOKENS: u32 = 1024;

/// Low temperature: the answer is a structured destination list.
const TEMPERATURE: f64 = 0.2;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A chat-completion endpoint that turns a rendered prompt into text.
pub struct LlmBackend {
    kind: BackendType,
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmBackend {
    /// Create a backend from configuration.
    pub fn from_config(config: &LlmBackendConfig) -> Self {
        Self {
            kind: config.backend_type,
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self.kind {
            BackendType::OpenAi => "openai-compatible",
            BackendType::Anthropic => "anthropic",
        }
    }

    /// Send a prompt and return the model's text answer.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Backend`] if the endpoint is unreachable,
    /// answers with a non-2xx status, or the response has no text content.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AdvisoryError> {
        let request = match self.kind {
            BackendType::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.api_url))
                .bearer_auth(&self.api_key)
                .json(&self.openai_body(prompt)),
            BackendType::Anthropic => self
                .client
                .post(format!("{}/messages", self.api_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&self.anthropic_body(prompt)),
        };

        let response = request
            .send()
            .await
            .map_err(|e| AdvisoryError::Backend(format!("{} request failed: {e}", self.name())))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Backend(format!(
                "{} returned {status}: {detail}",
                self.name()
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            AdvisoryError::Backend(format!("{} response is not JSON: {e}", self.name()))
        })?;
        answer_text(self.kind, &json)
    }

    fn openai_body(&self, prompt: &RenderedPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "response_format": {"type": "json_object"}
        })
    }

    fn anthropic_body(&self, prompt: &RenderedPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "system": prompt.system,
            "messages": [{"role": "user", "content": prompt.user}]
        })
    }
}

/// Pull the answer text out of a response body.
fn answer_text(kind: BackendType, json: &serde_json::Value) -> Result<String, AdvisoryError> {
    let pointer = match kind {
        BackendType::OpenAi => "/choices/0/message/content",
        BackendType::Anthropic => "/content/0/text",
    };
    json.pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| AdvisoryError::Backend(format!("response has no text at {pointer}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend_type: BackendType) -> LlmBackendConfig {
        LlmBackendConfig {
            backend_type,
            api_url: "https://llm.example.test/v1/".to_owned(),
            api_key: "test".to_owned(),
            model: "test-model".to_owned(),
        }
    }

    fn prompt() -> RenderedPrompt {
        RenderedPrompt {
            system: "Answer in JSON.".to_owned(),
            user: "Flood near 19.076, 72.8777.".to_owned(),
        }
    }

    #[test]
    fn openai_answer_text() {
        let json = serde_json::json!({
            "choices": [{
                "message": {"content": "{\"destinations\": [], \"guidance\": []}"}
            }]
        });
        let result = answer_text(BackendType::OpenAi, &json);
        assert!(result.is_ok_and(|text| text.contains("destinations")));
    }

    #[test]
    fn anthropic_answer_text() {
        let json = serde_json::json!({
            "content": [{"type": "text", "text": "{\"guidance\": [\"Move uphill\"]}"}]
        });
        let result = answer_text(BackendType::Anthropic, &json);
        assert!(result.is_ok_and(|text| text.contains("uphill")));
    }

    #[test]
    fn missing_or_blank_answer_is_backend_error() {
        let rate_limited = serde_json::json!({"error": "rate_limit"});
        assert!(matches!(
            answer_text(BackendType::OpenAi, &rate_limited),
            Err(AdvisoryError::Backend(_))
        ));

        let blank = serde_json::json!({"content": [{"type": "text", "text": "  "}]});
        assert!(answer_text(BackendType::Anthropic, &blank).is_err());

        // Right payload, wrong dialect.
        let openai = serde_json::json!({"choices": [{"message": {"content": "{}"}}]});
        assert!(answer_text(BackendType::Anthropic, &openai).is_err());
    }

    #[test]
    fn request_bodies_follow_dialect() {
        let openai = LlmBackend::from_config(&config(BackendType::OpenAi));
        assert_eq!(openai.name(), "openai-compatible");
        assert_eq!(openai.api_url, "https://llm.example.test/v1");
        let body = openai.openai_body(&prompt());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["response_format"]["type"], "json_object");

        let anthropic = LlmBackend::from_config(&config(BackendType::Anthropic));
        assert_eq!(anthropic.name(), "anthropic");
        let body = anthropic.anthropic_body(&prompt());
        assert_eq!(body["system"], "Answer in JSON.");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["max_tokens"], MAX_TOKENS);
    }
}
