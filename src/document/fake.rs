//! In-memory parsing library for tests
//!
//! Pages replay a fixed list of drawing operations and serve a fixed text
//! stream. Failures and delays are injected per page.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use image::Rgba;
use tokio::sync::Notify;

use super::error::{DocumentError, DocumentResult};
use super::traits::{DocumentHandle, DocumentLoader, PageHandle, RenderContext};
use super::types::{DocumentMetadata, PageAnnotation, TextContent, TextItem, Viewport};
use crate::raster::{PixelRect, Point};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Drawing operation in native coordinates (bottom-left origin)
#[derive(Debug, Clone)]
pub enum DrawOp {
    Rect { x: f64, y: f64, width: f64, height: f64, color: Rgba<u8> },
    Text { text: String, x: f64, y: f64, size: f64 },
}

/// Pauses a page's text stream until released
#[derive(Debug, Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub width: f64,
    pub height: f64,
    pub items: Vec<TextItem>,
    pub annotations: Vec<PageAnnotation>,
    pub ops: Vec<DrawOp>,
    pub render_error: Option<String>,
    pub text_error: Option<String>,
    pub annotations_error: bool,
    pub gate: Option<Gate>,
}

impl FakePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
            annotations: Vec::new(),
            ops: Vec::new(),
            render_error: None,
            text_error: None,
            annotations_error: false,
            gate: None,
        }
    }

    /// US Letter page
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn with_items(mut self, items: Vec<TextItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<PageAnnotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_ops(mut self, ops: Vec<DrawOp>) -> Self {
        self.ops = ops;
        self
    }

    pub fn failing_render(mut self, message: &str) -> Self {
        self.render_error = Some(message.to_string());
        self
    }

    pub fn failing_text(mut self, message: &str) -> Self {
        self.text_error = Some(message.to_string());
        self
    }

    pub fn failing_annotations(mut self) -> Self {
        self.annotations_error = true;
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl PageHandle for FakePage {
    fn viewport(&self, scale: f64) -> Viewport {
        Viewport::for_page(self.width, self.height, scale)
    }

    async fn text_content(&self) -> DocumentResult<TextContent> {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(message) = &self.text_error {
            return Err(DocumentError::TextContentError(message.clone()));
        }
        Ok(TextContent {
            items: self.items.clone(),
        })
    }

    async fn annotations(&self) -> DocumentResult<Vec<PageAnnotation>> {
        if self.annotations_error {
            return Err(DocumentError::Backend("annotation layer unavailable".to_string()));
        }
        Ok(self.annotations.clone())
    }

    async fn render(&self, mut ctx: RenderContext<'_>) -> DocumentResult<()> {
        let s = ctx.viewport.scale;
        for op in &self.ops {
            match op {
                DrawOp::Rect { x, y, width, height, color } => ctx.surface.fill_rect(
                    PixelRect {
                        left: x * s,
                        top: (self.height - y - height) * s,
                        width: width * s,
                        height: height * s,
                    },
                    *color,
                ),
                DrawOp::Text { text, x, y, size } => ctx.surface.fill_text(
                    text,
                    Point {
                        x: x * s,
                        y: (self.height - y) * s,
                    },
                    size * s,
                    BLACK,
                ),
            }
        }
        match &self.render_error {
            Some(message) => Err(DocumentError::RenderError(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub pages: Vec<Arc<FakePage>>,
    pub metadata: DocumentMetadata,
    pub metadata_error: bool,
}

impl FakeDocument {
    pub fn single(page: FakePage) -> Self {
        Self {
            pages: vec![Arc::new(page)],
            ..Default::default()
        }
    }

    pub fn with_info_flag(mut self, key: &str) -> Self {
        self.metadata
            .info
            .insert(key.to_string(), serde_json::Value::Bool(true));
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.metadata_error = true;
        self
    }
}

#[async_trait]
impl DocumentHandle for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn get_page(&self, page_number: usize) -> DocumentResult<Arc<dyn PageHandle>> {
        if page_number == 0 {
            return Err(DocumentError::PageNotFound(page_number));
        }
        self.pages
            .get(page_number - 1)
            .map(|p| p.clone() as Arc<dyn PageHandle>)
            .ok_or(DocumentError::PageNotFound(page_number))
    }

    async fn metadata(&self) -> DocumentResult<DocumentMetadata> {
        if self.metadata_error {
            return Err(DocumentError::Backend("info dictionary unreadable".to_string()));
        }
        Ok(self.metadata.clone())
    }
}

/// Resolves documents by their exact bytes
#[derive(Debug, Default)]
pub struct FakeLoader {
    documents: HashMap<Vec<u8>, Arc<FakeDocument>>,
}

impl FakeLoader {
    pub fn with_document(mut self, bytes: &[u8], doc: FakeDocument) -> Self {
        self.documents.insert(bytes.to_vec(), Arc::new(doc));
        self
    }
}

#[async_trait]
impl DocumentLoader for FakeLoader {
    async fn open_document(&self, bytes: &[u8]) -> DocumentResult<Arc<dyn DocumentHandle>> {
        if bytes.starts_with(b"%PDF-encrypted") {
            return Err(DocumentError::from_load_message("No password given"));
        }
        self.documents
            .get(bytes)
            .map(|d| d.clone() as Arc<dyn DocumentHandle>)
            .ok_or_else(|| DocumentError::from_load_message("Invalid PDF structure"))
    }
}
