//! Document error types
//!
//! Errors reported by the document-parsing library.

use thiserror::Error;

/// Parsing-library error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document is password protected
    #[error("Document is encrypted or password protected")]
    Encrypted,

    /// Document bytes could not be parsed
    #[error("Corrupted document: {0}")]
    Corrupted(String),

    /// Page number outside `1..=page_count`
    #[error("Page not found: {0}")]
    PageNotFound(usize),

    /// Page render pass failed inside the library
    #[error("Render error: {0}")]
    RenderError(String),

    /// Text content stream could not be read
    #[error("Text content error: {0}")]
    TextContentError(String),

    /// Any other library failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for parsing-library calls
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

impl DocumentError {
    /// Classify a raw library failure message.
    ///
    /// Libraries tend to report password protection as a generic load error;
    /// messages mentioning a password or encryption are mapped to
    /// [`DocumentError::Encrypted`].
    pub fn from_load_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("password") || lower.contains("encrypted") {
            DocumentError::Encrypted
        } else {
            DocumentError::Corrupted(message)
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, DocumentError::Encrypted)
    }
}
