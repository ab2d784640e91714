//! Discovery Engine search adapter.
//!
//! Issues `servingConfig:search` calls against the ordered candidate list and
//! normalizes the loosely-typed response payload into a `RetrievalOutcome`.
//! The first candidate that answers wins; once every candidate has failed,
//! the last error propagates to the caller.

use std::sync::Arc;

use docgate_auth::TokenSource;
use docgate_core::config::RetrievalConfig;
use docgate_core::error::{DocGateError, Result};
use docgate_core::types::{RetrievalOutcome, SearchResultItem};
use serde_json::{Value, json};

use crate::links::{normalize_link, strip_tags};
use crate::resource::{ResourcePaths, search_endpoint};
use crate::structdata::unwrap_struct;

const SUMMARY_RESULT_COUNT: u32 = 3;
const MAX_EXTRACTIVE_ANSWERS: u32 = 1;

pub struct SearchClient {
    config: RetrievalConfig,
    paths: ResourcePaths,
    endpoint: String,
    token: Arc<TokenSource>,
    client: reqwest::Client,
}

impl SearchClient {
    pub fn new(
        config: RetrievalConfig,
        token: Arc<TokenSource>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let paths = ResourcePaths::from_config(&config)?;
        let endpoint = search_endpoint(&config);
        Ok(Self {
            config,
            paths,
            endpoint,
            token,
            client,
        })
    }

    /// Number of serving-config candidates this client will try per call.
    pub fn candidate_count(&self) -> usize {
        self.paths.candidates().len()
    }

    /// Search the document index. Candidates are tried in order; results keep
    /// the relevance ranking the service returned.
    pub async fn search(&self, query: &str, page_size: u32) -> Result<RetrievalOutcome> {
        let body = self.build_request(query, page_size);
        let bearer = self.token.token().await?;
        let mut last_err = None;

        for serving_config in self.paths.candidates() {
            let url = format!("{}/{}:search", self.endpoint, serving_config);
            match self.try_search(&url, &bearer, &body).await {
                Ok(raw) => {
                    let outcome = parse_search_response(
                        &serving_config,
                        &raw,
                        &self.config.snippet_unavailable_marker,
                    );
                    tracing::debug!(
                        "Search \"{query}\" via {serving_config}: {} result(s)",
                        outcome.items.len()
                    );
                    return Ok(outcome);
                }
                Err(e) => {
                    tracing::warn!("Search via {serving_config} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            DocGateError::Config("No serving-config candidates configured".into())
        }))
    }

    fn build_request(&self, query: &str, page_size: u32) -> Value {
        let mut content_spec = json!({
            "snippetSpec": { "returnSnippet": self.config.return_snippet }
        });
        if self.config.return_summary {
            content_spec["summarySpec"] = json!({
                "summaryResultCount": SUMMARY_RESULT_COUNT,
                "includeCitations": false,
            });
        }
        if self.config.extractive_answers {
            content_spec["extractiveContentSpec"] = json!({
                "maxExtractiveAnswerCount": MAX_EXTRACTIVE_ANSWERS,
            });
        }
        json!({
            "query": query,
            "pageSize": page_size,
            "contentSearchSpec": content_spec,
        })
    }

    async fn try_search(&self, url: &str, bearer: &str, body: &Value) -> Result<Value> {
        let resp = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| DocGateError::Http(format!("Search connection failed ({url}): {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(retrieval_error(status.as_u16(), &text));
        }
        resp.json()
            .await
            .map_err(|e| DocGateError::Http(e.to_string()))
    }
}

/// Map a non-2xx search response onto the typed retrieval error, pulling the
/// service's own message out of the body when it parses.
fn retrieval_error(code: u16, body: &str) -> DocGateError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("Search request failed with status {code}"));
    DocGateError::Retrieval {
        code: Some(code),
        message,
        details: (!body.is_empty()).then(|| body.to_string()),
    }
}

/// Normalize one raw search response. Tolerates both the tagged
/// (`derivedStructData.fields`) and the plain JSON encoding.
pub fn parse_search_response(
    serving_config: &str,
    raw: &Value,
    unavailable_marker: &str,
) -> RetrievalOutcome {
    let items = raw["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .map(|r| result_item(r, unavailable_marker))
                .collect()
        })
        .unwrap_or_default();

    let summary = &raw["summary"];
    let summary_text = summary["summaryText"]
        .as_str()
        .or_else(|| summary["summary_text"].as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    RetrievalOutcome {
        serving_config_used: serving_config.to_string(),
        items,
        summary_text,
    }
}

fn result_item(result: &Value, unavailable_marker: &str) -> SearchResultItem {
    let document = &result["document"];
    let derived = unwrap_struct(&document["derivedStructData"]);

    let title = derived["title"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| document["id"].as_str())
        .map(String::from);

    let url = normalize_link(derived["link"].as_str().or_else(|| derived["uri"].as_str()));
    let snippet = extract_snippet(&derived, unavailable_marker);

    let extractive_answer = derived["extractive_answers"]
        .as_array()
        .and_then(|a| a.first())
        .and_then(|e| e["content"].as_str())
        .map(|s| strip_tags(s).trim().to_string())
        .filter(|s| !s.is_empty());

    SearchResultItem {
        title,
        url,
        snippet,
        extractive_answer,
    }
}

/// First snippet that exists and does not carry the service's "unavailable"
/// placeholder, with markup removed.
fn extract_snippet(derived: &Value, unavailable_marker: &str) -> Option<String> {
    let snippets = derived["snippets"].as_array()?;
    let marker = unavailable_marker.to_lowercase();
    for entry in snippets {
        let Some(text) = entry["snippet"].as_str() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        if !marker.is_empty() && text.to_lowercase().contains(&marker) {
            continue;
        }
        return Some(strip_tags(text).trim().to_string());
    }
    None
}
