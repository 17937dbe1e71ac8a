//! Layout model and serializer
//!
//! The layout model is the wire contract with the rendering service: page
//! size and every text object in native units, origin bottom-left.
//!
//! ```json
//! {
//!   "pageWidth": 612,
//!   "pageHeight": 792,
//!   "objects": [
//!     { "type": "text", "content": "Hello", "x": 72, "y": 700,
//!       "fontSize": 12, "fontFamily": "Helvetica", "color": "#000000", "rotation": 0 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EditorError, Result};
use crate::geometry::{CoordinateMapper, EditorBox, PageGeometry, RenderScale};
use crate::overlay::{OverlayModel, OverlayObject};

/// Kind of a layout object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutObjectKind {
    #[default]
    Text,
}

/// One object of a layout, in native units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutObject {
    #[serde(rename = "type")]
    pub kind: LayoutObjectKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    /// Degrees
    pub rotation: f64,
}

/// Snapshot of a page's edited state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutModel {
    pub page_width: f64,
    pub page_height: f64,
    pub objects: Vec<LayoutObject>,
}

fn require_finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EditorError::SerializationError(format!(
            "{} is not finite ({})",
            what, value
        )))
    }
}

impl LayoutModel {
    /// Check that every number is finite and the page has a positive size.
    pub fn validate(&self) -> Result<()> {
        require_finite("pageWidth", self.page_width)?;
        require_finite("pageHeight", self.page_height)?;
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(EditorError::SerializationError(format!(
                "page size {}x{} is not positive",
                self.page_width, self.page_height
            )));
        }
        for (i, object) in self.objects.iter().enumerate() {
            for (name, value) in [
                ("x", object.x),
                ("y", object.y),
                ("fontSize", object.font_size),
                ("rotation", object.rotation),
            ] {
                require_finite(&format!("objects[{}].{}", i, name), value)?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a layout produced elsewhere.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: LayoutModel = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }
}

/// Converts overlay state into a layout model
#[derive(Debug, Clone, Copy)]
pub struct LayoutSerializer {
    geometry: PageGeometry,
    mapper: CoordinateMapper,
}

impl LayoutSerializer {
    pub fn new(geometry: PageGeometry, scale: RenderScale) -> Self {
        Self {
            geometry,
            mapper: CoordinateMapper::new(geometry.height(), scale),
        }
    }

    fn object(&self, object: &OverlayObject) -> Result<LayoutObject> {
        let native = self.mapper.to_native_box(EditorBox {
            left: object.left,
            top: object.top,
            width: object.width,
            height: object.height,
        });
        let layout = LayoutObject {
            kind: LayoutObjectKind::Text,
            content: object.text.clone(),
            x: native.x,
            y: native.y,
            font_size: self.mapper.font_to_native(object.font_size),
            font_family: object.font_family.clone(),
            color: object.fill.clone(),
            rotation: object.rotation,
        };
        for (name, value) in [
            ("x", layout.x),
            ("y", layout.y),
            ("width", native.width),
            ("height", native.height),
            ("fontSize", layout.font_size),
            ("rotation", layout.rotation),
        ] {
            require_finite(&format!("object {} {}", object.id, name), value)?;
        }
        Ok(layout)
    }

    /// Snapshot the overlay in stacking order.
    pub fn serialize(&self, overlay: &OverlayModel) -> Result<LayoutModel> {
        let objects = overlay
            .iter()
            .map(|o| self.object(o))
            .collect::<Result<Vec<_>>>()?;

        debug!("Serialized layout with {} objects", objects.len());
        Ok(LayoutModel {
            page_width: self.geometry.width(),
            page_height: self.geometry.height(),
            objects,
        })
    }
}
