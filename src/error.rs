//! Error types for the editing pipeline
//!
//! Every stage of the pipeline reports through [`EditorError`]. Failures that
//! originate in the document-parsing library arrive as [`DocumentError`] and
//! are wrapped unchanged.

use thiserror::Error;

use crate::document::DocumentError;

/// Pipeline-wide result type
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editing pipeline error type
#[derive(Debug, Error)]
pub enum EditorError {
    /// Non-positive or non-finite page dimensions, scale, or object geometry
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// No drawing surface could be allocated for the requested viewport
    #[error("Render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// The page render pass failed
    #[error("Render failed: {0}")]
    RenderFailure(String),

    /// The page's text stream could not be read
    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    /// The edited state could not be expressed as a layout model
    #[error("Layout serialization failed: {0}")]
    SerializationError(String),

    /// Network failure while talking to the rendering service
    #[error("Export transport error: {0}")]
    ExportTransport(String),

    /// The rendering service answered with a non-success status
    #[error("Rendering service rejected the request ({status}): {message}")]
    ServiceRejected { status: u16, message: String },

    /// No overlay object carries the given id
    #[error("Unknown overlay object: {0}")]
    UnknownObject(String),

    /// Failure reported by the document-parsing library
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EditorError {
    /// Whether this error came back from the rendering service or the
    /// transport leading to it.
    pub fn is_export_error(&self) -> bool {
        matches!(
            self,
            EditorError::ExportTransport(_) | EditorError::ServiceRejected { .. }
        )
    }
}

impl From<reqwest::Error> for EditorError {
    fn from(err: reqwest::Error) -> Self {
        EditorError::ExportTransport(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::SerializationError(err.to_string())
    }
}
