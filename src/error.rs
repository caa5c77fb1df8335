//! Error types shared across the crate.

use thiserror::Error;

use crate::types::DocId;

/// Errors raised while selecting, fetching, packing or writing documents.
///
/// Problems local to one document (not found, unreadable PDF) are not errors
/// at the pipeline level: they are reported as skipped documents. Only
/// configuration problems and I/O on the output side abort a run.
#[derive(Debug, Error)]
pub enum RfcbookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: Box<str> },

    #[error("invalid document {id}: {reason}")]
    InvalidDocument { id: DocId, reason: Box<str> },

    #[error("invalid document id {input:?}")]
    InvalidId { input: String },

    #[error("failed to parse document index: {reason}")]
    IndexParse { reason: Box<str> },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "net")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
}

impl RfcbookError {
    pub(crate) fn invalid_config(reason: impl Into<Box<str>>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Configuration errors abort a run before any document is fetched.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::InvalidId { .. } | Self::Json(_)
        )
    }
}

/// Result type alias for rfcbook operations.
pub type Result<T> = std::result::Result<T, RfcbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = RfcbookError::InvalidDocument {
            id: DocId::new("RFC0791"),
            reason: "document has no pages".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid document RFC0791: document has no pages"
        );
    }

    #[test]
    fn config_errors_are_classified() {
        assert!(RfcbookError::invalid_config("max_pages must be positive").is_config_error());
        assert!(
            !RfcbookError::HttpStatus {
                url: "https://example.org".to_string(),
                status: 500,
            }
            .is_config_error()
        );
    }
}
