//! Native ↔ editor coordinate mapping
//!
//! Native space: document units, origin bottom-left, y grows upward, and a
//! run's `y` is its baseline-box bottom.
//!
//! Editor space: pixels at the render scale, origin top-left, y grows
//! downward, and `top` is the upper edge of the box.

use serde::{Deserialize, Serialize};

use super::scale::RenderScale;
use crate::extract::TextRun;

/// Font family used when a run carries no font name
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

/// Axis-aligned box in editor space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned box in native space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A text run placed in editor space
#[derive(Debug, Clone, PartialEq)]
pub struct EditorPlacement {
    pub bounds: EditorBox,
    pub font_size: f64,
    pub font_family: String,
}

/// Maps between native and editor space for one page at one scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    page_height: f64,
    scale: f64,
}

impl CoordinateMapper {
    pub fn new(page_height: f64, scale: RenderScale) -> Self {
        Self {
            page_height,
            scale: scale.get(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn to_editor_box(&self, native: NativeBox) -> EditorBox {
        let s = self.scale;
        let scaled_height = native.height * s;
        EditorBox {
            left: native.x * s,
            top: self.page_height * s - native.y * s - scaled_height,
            width: native.width * s,
            height: scaled_height,
        }
    }

    pub fn to_native_box(&self, editor: EditorBox) -> NativeBox {
        let s = self.scale;
        let height = editor.height / s;
        NativeBox {
            x: editor.left / s,
            y: self.page_height - editor.top / s - height,
            width: editor.width / s,
            height,
        }
    }

    pub fn font_to_editor(&self, font_size: f64) -> f64 {
        font_size * self.scale
    }

    pub fn font_to_native(&self, font_size: f64) -> f64 {
        font_size / self.scale
    }

    /// Place a text run in editor space.
    pub fn place(&self, run: &TextRun) -> EditorPlacement {
        EditorPlacement {
            bounds: self.to_editor_box(NativeBox {
                x: run.x,
                y: run.y,
                width: run.width,
                height: run.height,
            }),
            font_size: self.font_to_editor(run.font_size),
            font_family: run
                .font_name
                .clone()
                .unwrap_or_else(|| FALLBACK_FONT_FAMILY.to_string()),
        }
    }
}
