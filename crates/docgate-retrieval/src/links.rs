//! Link normalization and snippet scrubbing.

/// Scheme prefix used by storage-bucket URIs in derived document metadata.
const BUCKET_SCHEME: &str = "gs://";
/// Public HTTPS base that serves the same objects.
const PUBLIC_STORAGE_BASE: &str = "https://storage.googleapis.com/";

/// Rewrite `gs://bucket/object` into its public HTTPS URL, preserving the
/// path verbatim. Other URIs pass through unchanged; empty or missing input
/// yields `None`.
pub fn normalize_link(link: Option<&str>) -> Option<String> {
    let link = link?.trim();
    if link.is_empty() {
        return None;
    }
    if let Some(rest) = link.strip_prefix(BUCKET_SCHEME) {
        return Some(format!("{PUBLIC_STORAGE_BASE}{rest}"));
    }
    Some(link.to_string())
}

/// Remove `<...>` markup tags from snippet text. Unclosed tags swallow the
/// remainder of the string, matching a regex `<[^>]*>` scrub.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
