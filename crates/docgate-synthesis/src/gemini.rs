//! Vertex AI Gemini client.
//!
//! One `generateContent` call per chat request. The client joins every text
//! part of the first candidate; upstream decides what to do with empty output.

use std::sync::Arc;

use async_trait::async_trait;
use docgate_auth::TokenSource;
use docgate_core::config::GenerationConfig;
use docgate_core::error::{DocGateError, Result};
use serde_json::{Value, json};

use crate::AnswerModel;

pub struct GeminiClient {
    config: GenerationConfig,
    url: String,
    token: Arc<TokenSource>,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        config: GenerationConfig,
        token: Arc<TokenSource>,
        client: reqwest::Client,
    ) -> Result<Self> {
        if config.project.is_empty() {
            return Err(DocGateError::Config("generation.project is not set".into()));
        }
        let url = generate_content_url(&config);
        Ok(Self {
            config,
            url,
            token,
            client,
        })
    }

    /// Model id this client calls.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// `publishers/google/models/{model}:generateContent` on the regional host.
fn generate_content_url(config: &GenerationConfig) -> String {
    format!(
        "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:generateContent",
        loc = config.location,
        project = config.project,
        model = config.model,
    )
}

#[async_trait]
impl AnswerModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
            },
        });

        let bearer = self.token.token().await?;
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DocGateError::Http(format!("Model connection failed ({}): {e}", self.url))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DocGateError::Generation(format!(
                "{} API error {status}: {text}",
                self.config.model
            )));
        }

        let raw: Value = resp
            .json()
            .await
            .map_err(|e| DocGateError::Http(e.to_string()))?;
        let text = joined_candidate_text(&raw);
        tracing::debug!("{} returned {} chars", self.config.model, text.len());
        Ok(text)
    }
}

/// Join every text part of the first candidate; anything missing yields "".
pub fn joined_candidate_text(raw: &Value) -> String {
    raw["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_content_url() {
        let mut config = GenerationConfig::default();
        config.project = "groovy-root-483105".into();
        assert_eq!(
            generate_content_url(&config),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/groovy-root-483105/locations/us-central1/publishers/google/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_joined_candidate_text_concatenates_parts() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "The change log "},
                        {"text": "lists edits [1]."}
                    ]
                }
            }]
        });
        assert_eq!(joined_candidate_text(&raw), "The change log lists edits [1].");
    }

    #[test]
    fn test_joined_candidate_text_tolerates_missing_pieces() {
        assert_eq!(joined_candidate_text(&json!({})), "");
        assert_eq!(joined_candidate_text(&json!({"candidates": []})), "");
        let no_text_parts = json!({
            "candidates": [{"content": {"parts": [{"inlineData": {}}]}}]
        });
        assert_eq!(joined_candidate_text(&no_text_parts), "");
    }
}
