//! Document types
//!
//! Data handed over by the document-parsing library.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Page viewport at a given scale
///
/// Width and height are in device pixels (native units times `scale`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Viewport of a page with the given native size.
    pub fn for_page(native_width: f64, native_height: f64, scale: f64) -> Self {
        Self {
            width: native_width * scale,
            height: native_height * scale,
            scale,
        }
    }
}

/// One item of a page's text content stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    /// Text of the item
    #[serde(rename = "str")]
    pub text: String,

    /// Affine transform `[a, b, c, d, e, f]` placing the item in native space
    pub transform: [f64; 6],

    /// Advance width in native units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Height in native units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Font resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
}

impl TextItem {
    /// Item with an identity-scaled transform at `(x, y)`.
    pub fn at(text: &str, x: f64, y: f64, font_size: f64) -> Self {
        Self {
            text: text.to_string(),
            transform: [font_size, 0.0, 0.0, font_size, x, y],
            width: None,
            height: None,
            font_name: None,
        }
    }
}

/// A page's text content stream, in stream order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub items: Vec<TextItem>,
}

/// Page annotation, reduced to what the pipeline inspects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnnotation {
    /// Annotation subtype (`Widget`, `Sig`, `Link`, ...)
    pub subtype: String,
}

/// Document metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document information dictionary
    #[serde(default)]
    pub info: HashMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    /// Boolean flag from the information dictionary
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.info.get(key), Some(serde_json::Value::Bool(true)))
    }
}
