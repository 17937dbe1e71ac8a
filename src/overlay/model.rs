//! Overlay model
//!
//! The page's live editable objects in stacking order. Objects keep their
//! [`ObjectId`] for their whole life regardless of how they are mutated.

use tracing::debug;

use super::object::{
    ObjectId, ObjectPatch, OverlayObject, StyleDefaults, BLANK_FONT_FAMILY, BLANK_FONT_SIZE,
    BLANK_TEXT,
};
use crate::error::{EditorError, Result};
use crate::extract::TextRun;
use crate::geometry::{CoordinateMapper, EditorBox};

#[derive(Debug, Clone, Default)]
pub struct OverlayModel {
    objects: Vec<OverlayObject>,
    defaults: StyleDefaults,
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EditorError::InvalidGeometry(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

impl OverlayModel {
    pub fn new(defaults: StyleDefaults) -> Self {
        Self {
            objects: Vec::new(),
            defaults,
        }
    }

    /// One object per run, in run order.
    pub fn from_runs<I>(runs: I, mapper: &CoordinateMapper, defaults: StyleDefaults) -> Result<Self>
    where
        I: IntoIterator<Item = TextRun>,
    {
        let mut model = Self::new(defaults);
        for run in runs {
            model.add_run(&run, mapper)?;
        }
        debug!("Overlay initialized with {} objects", model.len());
        Ok(model)
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    fn styled(&self, text: String, bounds: EditorBox, font_size: f64, font_family: String) -> OverlayObject {
        let d = &self.defaults;
        OverlayObject {
            id: ObjectId::new(),
            text,
            left: bounds.left,
            top: bounds.top,
            width: bounds.width.max(0.0),
            height: bounds.height.max(0.0),
            font_size,
            font_family,
            rotation: d.rotation,
            fill: d.fill.clone(),
            font_weight: d.font_weight.clone(),
            font_style: d.font_style.clone(),
            underline: d.underline,
            strikethrough: d.strikethrough,
            text_align: d.text_align,
            line_height: d.line_height,
            char_spacing: d.char_spacing,
        }
    }

    /// Add an object for an extracted run, placed through the mapper.
    ///
    /// Runs whose placed geometry is not finite are rejected.
    pub fn add_run(&mut self, run: &TextRun, mapper: &CoordinateMapper) -> Result<ObjectId> {
        let placed = mapper.place(run);
        let b = placed.bounds;
        for (name, value) in [
            ("left", b.left),
            ("top", b.top),
            ("width", b.width),
            ("height", b.height),
            ("font size", placed.font_size),
        ] {
            require_finite(name, value)?;
        }
        let object = self.styled(
            run.text.clone(),
            placed.bounds,
            placed.font_size,
            placed.font_family,
        );
        let id = object.id;
        self.objects.push(object);
        Ok(id)
    }

    /// Add a user-created "New text" object at the given editor position.
    pub fn add_blank(&mut self, left: f64, top: f64) -> Result<ObjectId> {
        require_finite("left", left)?;
        require_finite("top", top)?;
        let bounds = EditorBox {
            left,
            top,
            width: 0.0,
            height: BLANK_FONT_SIZE,
        };
        let object = self.styled(
            BLANK_TEXT.to_string(),
            bounds,
            BLANK_FONT_SIZE,
            BLANK_FONT_FAMILY.to_string(),
        );
        let id = object.id;
        self.objects.push(object);
        Ok(id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<OverlayObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Apply a partial update to one object.
    ///
    /// Non-finite numbers reject the whole patch; negative width or height
    /// clamp to zero.
    pub fn update(&mut self, id: ObjectId, patch: ObjectPatch) -> Result<&OverlayObject> {
        for (name, value) in patch.numeric_fields() {
            if let Some(v) = value {
                require_finite(name, v)?;
            }
        }

        let object = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| EditorError::UnknownObject(id.to_string()))?;
        object.apply(patch);
        Ok(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&OverlayObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayObject> {
        self.objects.iter()
    }

    pub fn objects(&self) -> &[OverlayObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Swap in another model's objects, keeping this model's defaults.
    pub fn replace_with(&mut self, other: OverlayModel) {
        self.objects = other.objects;
    }
}
