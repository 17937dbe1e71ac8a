//! Layout export
//!
//! Sends the original document and its edited layout to the rendering
//! service, which returns the regenerated document. Each export is a single
//! request; nothing is retried.

mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::layout::LayoutModel;

pub use client::RenderServiceClient;

/// Turns an original document plus a layout into a new document
#[async_trait]
pub trait LayoutExporter: Send + Sync {
    async fn export(&self, document: Vec<u8>, layout: &LayoutModel) -> Result<Vec<u8>>;
}
