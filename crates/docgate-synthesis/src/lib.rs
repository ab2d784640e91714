//! # DocGate Synthesis
//!
//! Turns a `RetrievalOutcome` into the single user-facing answer string.
//! Strict priority, first applicable wins:
//!
//! 1. the retrieval service's own summary, verbatim;
//! 2. a citation-prompted generative-model call;
//! 3. deterministic assembly from the retrieved items.
//!
//! Greeting and empty-query pre-filters live in [`greeting`] and run before
//! any outbound call is made.

pub mod fallback;
pub mod gemini;
pub mod greeting;
pub mod prompt;

use async_trait::async_trait;
use docgate_core::error::Result;
use docgate_core::types::RetrievalOutcome;

/// Literal answer when a configured model returns no text.
pub const NO_RESPONSE: &str = "No response.";

/// Seam between the synthesizer and whichever generative backend is
/// configured. Kept as a trait so tests can stub the model out.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Produce the answer for one retrieval outcome.
pub async fn synthesize(
    query: &str,
    outcome: &RetrievalOutcome,
    model: Option<&dyn AnswerModel>,
) -> Result<String> {
    if let Some(summary) = &outcome.summary_text {
        return Ok(summary.clone());
    }

    if let Some(model) = model {
        let prompt = prompt::build_prompt(query, &outcome.items);
        let text = model.generate(&prompt).await?;
        let text = text.trim();
        return Ok(if text.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            text.to_string()
        });
    }

    Ok(fallback::assemble(&outcome.items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_core::types::SearchResultItem;

    struct StubModel(&'static str);

    #[async_trait]
    impl AnswerModel for StubModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn outcome(summary: Option<&str>, items: Vec<SearchResultItem>) -> RetrievalOutcome {
        RetrievalOutcome {
            serving_config_used: "sc".into(),
            items,
            summary_text: summary.map(String::from),
        }
    }

    fn snippet_item(snippet: &str) -> SearchResultItem {
        SearchResultItem {
            title: Some("Doc".into()),
            snippet: Some(snippet.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summary_wins_even_over_model() {
        let model = StubModel("model answer");
        let out = outcome(Some("Service summary."), vec![snippet_item("s")]);
        let answer = synthesize("q", &out, Some(&model)).await.unwrap();
        assert_eq!(answer, "Service summary.");
    }

    #[tokio::test]
    async fn test_model_used_when_no_summary() {
        let model = StubModel("Cited answer [1].");
        let out = outcome(None, vec![snippet_item("s")]);
        let answer = synthesize("q", &out, Some(&model)).await.unwrap();
        assert_eq!(answer, "Cited answer [1].");
    }

    #[tokio::test]
    async fn test_blank_model_output_becomes_no_response() {
        let model = StubModel("   ");
        let out = outcome(None, vec![]);
        let answer = synthesize("q", &out, Some(&model)).await.unwrap();
        assert_eq!(answer, NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_no_model_falls_back_to_assembly() {
        let out = outcome(None, vec![snippet_item("useful details here")]);
        let answer = synthesize("q", &out, None).await.unwrap();
        assert!(answer.contains("useful details here"));
    }

    #[tokio::test]
    async fn test_nothing_at_all_yields_no_match_message() {
        let out = outcome(None, vec![]);
        let answer = synthesize("q", &out, None).await.unwrap();
        assert_eq!(answer, fallback::NO_MATCH);
        assert!(!answer.is_empty());
    }
}
