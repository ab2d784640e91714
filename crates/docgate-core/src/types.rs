//! Shared data model for DocGate.
//!
//! Everything here is ephemeral — constructed per request, never persisted.

use serde::{Deserialize, Serialize};

/// One normalized hit from the document index, in relevance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: Option<String>,
    /// Already HTTPS-normalized; `None` when the document has no link.
    pub url: Option<String>,
    /// HTML-stripped; `None` when only placeholder snippets came back.
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractive_answer: Option<String>,
}

/// Everything one search call produced. `items` preserves the relevance
/// ranking returned by the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub serving_config_used: String,
    pub items: Vec<SearchResultItem>,
    pub summary_text: Option<String>,
}

impl RetrievalOutcome {
    /// Linkable sources only: items without a resolvable url are dropped here
    /// (they still feed synthesis). Untitled items keep a placeholder title.
    pub fn source_links(&self) -> Vec<SourceLink> {
        self.items
            .iter()
            .filter_map(|item| {
                let url = item.url.clone().filter(|u| !u.is_empty())?;
                Some(SourceLink {
                    title: item
                        .title
                        .clone()
                        .unwrap_or_else(|| "Document".to_string()),
                    url,
                })
            })
            .collect()
    }
}

/// A linkable source attached to a chat answer. `url` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
}

/// Successful `POST /chat` response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ChatDebug>,
}

/// Diagnostics attached to successful chat responses.
#[derive(Debug, Serialize)]
pub struct ChatDebug {
    pub serving_config_used: String,
    pub retrieved_count: usize,
    pub request_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: Option<&str>, url: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            title: title.map(String::from),
            url: url.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_source_links_drop_items_without_url() {
        let outcome = RetrievalOutcome {
            serving_config_used: "sc".into(),
            items: vec![
                item(Some("A"), Some("https://example.com/a")),
                item(Some("B"), None),
                item(Some("C"), Some("https://example.com/c")),
            ],
            summary_text: None,
        };
        let links = outcome.source_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "A");
        assert_eq!(links[1].url, "https://example.com/c");
    }

    #[test]
    fn test_source_links_preserve_order() {
        let outcome = RetrievalOutcome {
            serving_config_used: "sc".into(),
            items: vec![
                item(Some("first"), Some("https://e.com/1")),
                item(Some("second"), Some("https://e.com/2")),
            ],
            summary_text: None,
        };
        let titles: Vec<_> = outcome.source_links().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_source_links_untitled_placeholder() {
        let outcome = RetrievalOutcome {
            serving_config_used: "sc".into(),
            items: vec![item(None, Some("https://e.com/doc"))],
            summary_text: None,
        };
        assert_eq!(outcome.source_links()[0].title, "Document");
    }

    #[test]
    fn test_chat_request_missing_query_defaults_empty() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.query.is_empty());
    }
}
