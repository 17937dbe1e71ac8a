//! Rendered page backgrounds
//!
//! PNG encoding follows the same path as page renders elsewhere in Amnesia:
//! RGBA buffer, `DynamicImage`, `write_to` a cursor.

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, RgbaImage};

use crate::error::{EditorError, Result};

/// RGBA raster of a page
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        DynamicImage::ImageRgba8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
            .map_err(|e| EditorError::RenderFailure(format!("PNG encoding failed: {}", e)))?;
        Ok(output)
    }

    /// Encode as a `data:image/png;base64,` URL for an editor canvas background
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}
