//! Deterministic answer assembly when no summary and no model are available.

use docgate_core::types::SearchResultItem;

/// Fixed reply when retrieval produced nothing usable.
pub const NO_MATCH: &str = "I couldn't find any documents matching your question.";

const SNIPPET_PREFIX: &str = "Here's what I found in the documents: ";
const TITLES_PREFIX: &str = "I found these documents that may help:";
const UNTITLED: &str = "Document";

/// First extractive answer → first snippet → bulleted titles → no-match.
pub fn assemble(items: &[SearchResultItem]) -> String {
    if let Some(answer) = items.iter().find_map(|i| i.extractive_answer.as_deref()) {
        return answer.to_string();
    }

    if let Some(snippet) = items.iter().find_map(|i| i.snippet.as_deref()) {
        return format!("{SNIPPET_PREFIX}{snippet}");
    }

    if !items.is_empty() {
        let titles = items
            .iter()
            .map(|i| format!("• {}", i.title.as_deref().unwrap_or(UNTITLED)))
            .collect::<Vec<_>>()
            .join("\n");
        return format!("{TITLES_PREFIX}\n{titles}");
    }

    NO_MATCH.to_string()
}
