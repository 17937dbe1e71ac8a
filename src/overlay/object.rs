//! Overlay object types

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of an overlay object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Styling applied to objects that do not specify their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefaults {
    pub rotation: f64,
    pub fill: String,
    pub font_weight: String,
    pub font_style: String,
    pub underline: bool,
    pub strikethrough: bool,
    pub text_align: TextAlign,
    pub line_height: f64,
    pub char_spacing: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            fill: "#000000".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            underline: false,
            strikethrough: false,
            text_align: TextAlign::Left,
            line_height: 1.16,
            char_spacing: 0.0,
        }
    }
}

/// Content of an object the user creates from scratch
pub const BLANK_TEXT: &str = "New text";
pub const BLANK_FONT_SIZE: f64 = 16.0;
pub const BLANK_FONT_FAMILY: &str = "Arial";

/// Editable text object in editor space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayObject {
    pub id: ObjectId,
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    /// Degrees, clockwise
    pub rotation: f64,
    pub fill: String,
    pub font_weight: String,
    pub font_style: String,
    pub underline: bool,
    pub strikethrough: bool,
    pub text_align: TextAlign,
    pub line_height: f64,
    pub char_spacing: f64,
}

/// Partial update of an overlay object
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPatch {
    pub text: Option<String>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub rotation: Option<f64>,
    pub fill: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub char_spacing: Option<f64>,
}

impl ObjectPatch {
    pub fn moved_to(left: f64, top: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            ..Default::default()
        }
    }

    pub fn resized(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Numeric fields carried by the patch, with their names
    pub(crate) fn numeric_fields(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
            ("fontSize", self.font_size),
            ("rotation", self.rotation),
            ("lineHeight", self.line_height),
            ("charSpacing", self.char_spacing),
        ]
    }
}

impl OverlayObject {
    /// Apply a validated patch. Width and height never go below zero.
    pub(crate) fn apply(&mut self, patch: ObjectPatch) {
        let ObjectPatch {
            text,
            left,
            top,
            width,
            height,
            font_size,
            font_family,
            rotation,
            fill,
            font_weight,
            font_style,
            underline,
            strikethrough,
            text_align,
            line_height,
            char_spacing,
        } = patch;

        if let Some(v) = text {
            self.text = v;
        }
        if let Some(v) = left {
            self.left = v;
        }
        if let Some(v) = top {
            self.top = v;
        }
        if let Some(v) = width {
            self.width = v.max(0.0);
        }
        if let Some(v) = height {
            self.height = v.max(0.0);
        }
        if let Some(v) = font_size {
            self.font_size = v;
        }
        if let Some(v) = font_family {
            self.font_family = v;
        }
        if let Some(v) = rotation {
            self.rotation = v;
        }
        if let Some(v) = fill {
            self.fill = v;
        }
        if let Some(v) = font_weight {
            self.font_weight = v;
        }
        if let Some(v) = font_style {
            self.font_style = v;
        }
        if let Some(v) = underline {
            self.underline = v;
        }
        if let Some(v) = strikethrough {
            self.strikethrough = v;
        }
        if let Some(v) = text_align {
            self.text_align = v;
        }
        if let Some(v) = line_height {
            self.line_height = v;
        }
        if let Some(v) = char_spacing {
            self.char_spacing = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids_are_unique() {
        assert_ne!(ObjectId::new(), ObjectId::new());
    }

    #[test]
    fn test_patch_deserializes_partial_camel_case() {
        let patch: ObjectPatch =
            serde_json::from_str(r##"{"fontSize": 20, "fill": "#ff0000", "textAlign": "center"}"##)
                .unwrap();
        assert_eq!(patch.font_size, Some(20.0));
        assert_eq!(patch.fill.as_deref(), Some("#ff0000"));
        assert_eq!(patch.text_align, Some(TextAlign::Center));
        assert!(patch.left.is_none());
    }

    #[test]
    fn test_style_defaults() {
        let d = StyleDefaults::default();
        assert_eq!(d.fill, "#000000");
        assert_eq!(d.line_height, 1.16);
        assert_eq!(d.text_align, TextAlign::Left);
    }
}
