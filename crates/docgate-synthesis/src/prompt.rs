//! Citation-constrained prompt assembly.

use docgate_core::types::SearchResultItem;

const UNTITLED: &str = "Document";

/// Build the grounding prompt: instruction preamble, then each source as a
/// numbered `[n]` block with URL and excerpt, so the model can cite by index.
pub fn build_prompt(query: &str, items: &[SearchResultItem]) -> String {
    let sources = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut parts = vec![format!(
                "[{}] {}",
                i + 1,
                item.title.as_deref().unwrap_or(UNTITLED)
            )];
            if let Some(url) = &item.url {
                parts.push(format!("URL: {url}"));
            }
            if let Some(snippet) = &item.snippet {
                parts.push(format!("Excerpt: {snippet}"));
            }
            parts.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a helpful assistant for internal documentation.\n\
         Answer the user's question using ONLY the provided sources.\n\
         If the user asks for translation, translate accurately and keep the meaning.\n\
         If the sources do not contain enough information, say what is missing and ask for a more specific term or file name.\n\
         \n\
         Cite sources inline using [1], [2], etc.\n\
         \n\
         User question:\n{query}\n\nSources:\n{sources}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, url: Option<&str>, snippet: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            title: Some(title.into()),
            url: url.map(String::from),
            snippet: snippet.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_sources_numbered_in_order() {
        let items = vec![
            item("First.docx", Some("https://e.com/1"), Some("one")),
            item("Second.pdf", Some("https://e.com/2"), Some("two")),
        ];
        let prompt = build_prompt("what changed?", &items);
        assert!(prompt.contains("[1] First.docx"));
        assert!(prompt.contains("[2] Second.pdf"));
        assert!(prompt.contains("URL: https://e.com/2"));
        assert!(prompt.contains("Excerpt: one"));
        assert!(prompt.contains("User question:\nwhat changed?"));
        assert!(prompt.find("[1]").unwrap() < prompt.find("[2]").unwrap());
    }

    #[test]
    fn test_sparse_items_emit_only_known_lines() {
        let items = vec![SearchResultItem::default()];
        let prompt = build_prompt("q", &items);
        assert!(prompt.contains("[1] Document"));
        assert!(!prompt.contains("URL:"));
        assert!(!prompt.contains("Excerpt:"));
    }

    #[test]
    fn test_citation_instruction_present() {
        let prompt = build_prompt("q", &[]);
        assert!(prompt.contains("ONLY the provided sources"));
        assert!(prompt.contains("[1], [2]"));
    }
}
