//! Error types shared across DocGate crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocGateError>;

#[derive(Debug, Error)]
pub enum DocGateError {
    /// Missing or malformed configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Credential parsing or token-exchange failure.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Transport-level failure before any HTTP status was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The retrieval service rejected the search call. `code` and `details`
    /// carry whatever the transport supplied, for the caller's error body.
    #[error("Retrieval failed: {message}")]
    Retrieval {
        code: Option<u16>,
        message: String,
        details: Option<String>,
    },

    /// The generative-model call failed.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_display_uses_message() {
        let err = DocGateError::Retrieval {
            code: Some(403),
            message: "Permission denied".into(),
            details: Some("{\"error\":{}}".into()),
        };
        assert_eq!(err.to_string(), "Retrieval failed: Permission denied");
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DocGateError = parse_err.into();
        assert!(matches!(err, DocGateError::Json(_)));
    }
}
