//! Document traits
//!
//! Interfaces of the document-parsing library the pipeline consumes. The
//! pipeline never parses document bytes itself.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::DocumentResult;
use super::types::{DocumentMetadata, PageAnnotation, TextContent, Viewport};
use crate::raster::DrawingSurface;

/// Opens documents from raw bytes
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn open_document(&self, bytes: &[u8]) -> DocumentResult<Arc<dyn DocumentHandle>>;
}

/// An opened document
#[async_trait]
pub trait DocumentHandle: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Load a page by 1-based page number
    async fn get_page(&self, page_number: usize) -> DocumentResult<Arc<dyn PageHandle>>;

    /// Document information dictionary
    async fn metadata(&self) -> DocumentResult<DocumentMetadata>;
}

/// A loaded page
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Viewport of the page at `scale`; `viewport(1.0)` is the native size
    fn viewport(&self, scale: f64) -> Viewport;

    /// Text content stream in stream order
    async fn text_content(&self) -> DocumentResult<TextContent>;

    /// Page annotations
    async fn annotations(&self) -> DocumentResult<Vec<PageAnnotation>>;

    /// Draw the page onto the surface in the render context
    async fn render(&self, ctx: RenderContext<'_>) -> DocumentResult<()>;
}

/// Target of a single render pass
///
/// The surface is owned by the caller for the duration of the pass; the page
/// draws exclusively through it.
pub struct RenderContext<'a> {
    pub surface: &'a mut (dyn DrawingSurface + Send),
    pub viewport: Viewport,
}
