//! Graphics-only page rasterizer
//!
//! Renders everything on a page except its glyphs, producing the background
//! the editable text overlay sits on. Each call allocates its own surface and
//! suppresses text on that surface only; nothing shared is patched.

use tracing::{debug, error};

use super::background::RasterImage;
use super::suppress::TextSuppression;
use super::surface::RasterSurface;
use crate::document::{PageHandle, RenderContext, Viewport};
use crate::error::{EditorError, Result};
use crate::geometry::RenderScale;

/// Default pixel budget for one surface (4096 x 4096)
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 16_777_216;

/// Output of a render pass
#[derive(Debug, Clone)]
pub struct RenderedBackground {
    pub width: u32,
    pub height: u32,
    pub image: RasterImage,
    /// Text draw calls the page issued and the surface swallowed
    pub suppressed_text_ops: usize,
}

/// Rasterizes pages with text drawing disabled
#[derive(Debug, Clone, Copy)]
pub struct GraphicsOnlyRasterizer {
    max_surface_pixels: u64,
}

impl Default for GraphicsOnlyRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SURFACE_PIXELS)
    }
}

impl GraphicsOnlyRasterizer {
    pub fn new(max_surface_pixels: u64) -> Self {
        Self { max_surface_pixels }
    }

    /// Allocate a surface for the viewport.
    pub fn allocate(&self, viewport: &Viewport) -> Result<RasterSurface> {
        if !viewport.width.is_finite()
            || !viewport.height.is_finite()
            || viewport.width <= 0.0
            || viewport.height <= 0.0
        {
            return Err(EditorError::RenderSurfaceUnavailable(format!(
                "viewport {}x{} has no drawable area",
                viewport.width, viewport.height
            )));
        }

        let width = viewport.width.ceil() as u64;
        let height = viewport.height.ceil() as u64;
        let pixels = width.saturating_mul(height);
        if pixels > self.max_surface_pixels || width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(EditorError::RenderSurfaceUnavailable(format!(
                "{}x{} surface exceeds the {} pixel budget",
                width, height, self.max_surface_pixels
            )));
        }

        Ok(RasterSurface::new(width as u32, height as u32))
    }

    /// Render the page's graphics without its text.
    pub async fn render(&self, page: &dyn PageHandle, scale: RenderScale) -> Result<RenderedBackground> {
        self.render_pass(page, scale, true).await
    }

    /// Render the page with text, for comparison against the background.
    pub async fn render_full(
        &self,
        page: &dyn PageHandle,
        scale: RenderScale,
    ) -> Result<RenderedBackground> {
        self.render_pass(page, scale, false).await
    }

    async fn render_pass(
        &self,
        page: &dyn PageHandle,
        scale: RenderScale,
        suppress_text: bool,
    ) -> Result<RenderedBackground> {
        let viewport = page.viewport(scale.get());
        let mut surface = self.allocate(&viewport)?;

        let outcome = if suppress_text {
            let mut guard = TextSuppression::new(&mut surface);
            page.render(RenderContext {
                surface: &mut *guard,
                viewport,
            })
            .await
        } else {
            page.render(RenderContext {
                surface: &mut surface,
                viewport,
            })
            .await
        };

        if let Err(e) = outcome {
            error!("Page render failed at scale {}: {}", scale.get(), e);
            return Err(EditorError::RenderFailure(e.to_string()));
        }

        let suppressed_text_ops = surface.text_suppressed();
        debug!(
            "Rendered page background {}x{} ({} text ops suppressed)",
            surface.image().width(),
            surface.image().height(),
            suppressed_text_ops
        );

        let image = RasterImage::new(surface.into_image());
        Ok(RenderedBackground {
            width: image.width(),
            height: image.height(),
            image,
            suppressed_text_ops,
        })
    }
}
