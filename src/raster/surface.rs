//! Drawing surface
//!
//! The parsing library renders a page by calling into a [`DrawingSurface`].
//! [`RasterSurface`] is the in-memory RGBA implementation used by the
//! rasterizer.

use image::{imageops, Pixel, Rgba, RgbaImage};

/// Point in device pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Rectangle in device pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawing entry points a page render pass may use
pub trait DrawingSurface {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>);

    /// Fill a closed polygon using the even-odd rule
    fn fill_polygon(&mut self, points: &[Point], color: Rgba<u8>);

    /// Composite an image with its top-left corner at `at`
    fn draw_image(&mut self, image: &RgbaImage, at: Point);

    /// Fill glyphs; `origin` is the left end of the baseline
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>);

    /// Stroke glyph outlines; `origin` is the left end of the baseline
    fn stroke_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>);

    fn text_enabled(&self) -> bool;

    /// Turn the text entry points into no-ops (or back)
    fn set_text_enabled(&mut self, enabled: bool);
}

/// Average glyph advance relative to the font size
const GLYPH_ADVANCE: f64 = 0.6;

/// RGBA drawing surface over an [`RgbaImage`]
///
/// Starts white. Glyphs are painted as solid boxes of the run's advance and
/// font size; no font outlines are rasterized.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    text_enabled: bool,
    text_drawn: usize,
    text_suppressed: usize,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            text_enabled: true,
            text_drawn: 0,
            text_suppressed: 0,
        }
    }

    /// Text draw calls that reached the surface
    pub fn text_drawn(&self) -> usize {
        self.text_drawn
    }

    /// Text draw calls swallowed while text was disabled
    pub fn text_suppressed(&self) -> usize {
        self.text_suppressed
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        self.image.get_pixel_mut(x, y).blend(&src);
    }

    /// Clamp a span of device coordinates to pixel indices `[start, end)`.
    fn clamp_span(start: f64, end: f64, limit: u32) -> Option<(u32, u32)> {
        if !start.is_finite() || !end.is_finite() {
            return None;
        }
        let lo = start.round().max(0.0).min(limit as f64) as u32;
        let hi = end.round().max(0.0).min(limit as f64) as u32;
        (lo < hi).then_some((lo, hi))
    }

    fn paint_box(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let (width, height) = self.image.dimensions();
        let Some((x0, x1)) = Self::clamp_span(rect.left, rect.left + rect.width, width) else {
            return;
        };
        let Some((y0, y1)) = Self::clamp_span(rect.top, rect.top + rect.height, height) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn glyph_box(text: &str, origin: Point, font_size: f64) -> PixelRect {
        PixelRect {
            left: origin.x,
            top: origin.y - font_size,
            width: text.chars().count() as f64 * font_size * GLYPH_ADVANCE,
            height: font_size,
        }
    }

    /// Record a text call; returns whether it should be painted.
    fn admit_text(&mut self) -> bool {
        if self.text_enabled {
            self.text_drawn += 1;
        } else {
            self.text_suppressed += 1;
        }
        self.text_enabled
    }
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        self.paint_box(rect, color);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba<u8>) {
        if points.len() < 3 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }
        let (width, height) = self.image.dimensions();
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let Some((y0, y1)) = Self::clamp_span(min_y, max_y, height) else {
            return;
        };

        let mut crossings = Vec::new();
        for y in y0..y1 {
            let sample = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sample && b.y > sample) || (b.y <= sample && a.y > sample) {
                    crossings.push(a.x + (sample - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|l, r| l.total_cmp(r));
            for pair in crossings.chunks_exact(2) {
                if let Some((x0, x1)) = Self::clamp_span(pair[0], pair[1], width) {
                    for x in x0..x1 {
                        self.blend(x, y, color);
                    }
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, at: Point) {
        if !at.x.is_finite() || !at.y.is_finite() {
            return;
        }
        imageops::overlay(&mut self.image, image, at.x.round() as i64, at.y.round() as i64);
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>) {
        if self.admit_text() {
            self.paint_box(Self::glyph_box(text, origin, font_size), color);
        }
    }

    fn stroke_text(&mut self, text: &str, origin: Point, font_size: f64, color: Rgba<u8>) {
        if !self.admit_text() {
            return;
        }
        let b = Self::glyph_box(text, origin, font_size);
        let edges = [
            PixelRect { height: 1.0, ..b },
            PixelRect { top: b.top + b.height - 1.0, height: 1.0, ..b },
            PixelRect { width: 1.0, ..b },
            PixelRect { left: b.left + b.width - 1.0, width: 1.0, ..b },
        ];
        for edge in edges {
            self.paint_box(edge, color);
        }
    }

    fn text_enabled(&self) -> bool {
        self.text_enabled
    }

    fn set_text_enabled(&mut self, enabled: bool) {
        self.text_enabled = enabled;
    }
}
