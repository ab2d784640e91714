//! Pre-filter stage: canned replies that skip retrieval entirely.
//!
//! Greetings and empty input don't need a search round-trip; answering them
//! locally saves a retrieval call and, when generation is on, a model call.

/// Reply for empty or whitespace-only queries.
pub const EMPTY_QUERY: &str = "Ask me something.";

const GREETING_REPLY: &str =
    "Hello! Ask me anything about the documentation and I'll look it up for you.";

const GREETINGS: [&str; 10] = [
    "hello",
    "hi",
    "hey",
    "howdy",
    "yo",
    "good morning",
    "good afternoon",
    "good evening",
    "hi there",
    "hello there",
];

/// Canned response for greeting-style input, or `None` to continue to
/// retrieval. Matching is case-insensitive with punctuation stripped, so
/// "Hello!!" and "  good   morning " both short-circuit.
pub fn greeting_reply(query: &str) -> Option<&'static str> {
    let lowered: String = query
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let normalized = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    GREETINGS
        .contains(&normalized.as_str())
        .then_some(GREETING_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_greetings_match() {
        for q in ["hello", "hi", "hey", "good morning"] {
            assert!(greeting_reply(q).is_some(), "{q} should short-circuit");
        }
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        assert!(greeting_reply("Hello!!!").is_some());
        assert!(greeting_reply("  Good   Morning ").is_some());
        assert!(greeting_reply("HEY.").is_some());
    }

    #[test]
    fn test_real_questions_pass_through() {
        assert!(greeting_reply("hello, where is the change log?").is_none());
        assert!(greeting_reply("say hi to the team").is_none());
        assert!(greeting_reply("contact change log").is_none());
    }

    #[test]
    fn test_empty_input_not_a_greeting() {
        // empty queries get their own canned reply upstream
        assert!(greeting_reply("").is_none());
        assert!(greeting_reply("   ").is_none());
    }
}
