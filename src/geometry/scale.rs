//! Render scale selection
//!
//! Fits a page into the editor viewport without ever upscaling past
//! [`MAX_RENDER_SCALE`].

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Upper bound on the render scale
pub const MAX_RENDER_SCALE: f64 = 2.0;

fn check_dimension(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EditorError::InvalidGeometry(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Native page size in document units (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    native_width: f64,
    native_height: f64,
}

impl PageGeometry {
    pub fn new(native_width: f64, native_height: f64) -> Result<Self> {
        check_dimension("page width", native_width)?;
        check_dimension("page height", native_height)?;
        Ok(Self {
            native_width,
            native_height,
        })
    }

    pub fn width(&self) -> f64 {
        self.native_width
    }

    pub fn height(&self) -> f64 {
        self.native_height
    }
}

/// Positive render scale, at most [`MAX_RENDER_SCALE`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct RenderScale(f64);

impl RenderScale {
    pub fn new(value: f64) -> Result<Self> {
        check_dimension("render scale", value)?;
        if value > MAX_RENDER_SCALE {
            return Err(EditorError::InvalidGeometry(format!(
                "render scale {} exceeds {}",
                value, MAX_RENDER_SCALE
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Maximum viewport the page is fitted into, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportBudget {
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for ViewportBudget {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            max_height: 1000.0,
        }
    }
}

/// Chooses the render scale for a page
#[derive(Debug, Clone, Copy)]
pub struct ScaleSelector {
    budget: ViewportBudget,
}

impl Default for ScaleSelector {
    fn default() -> Self {
        Self {
            budget: ViewportBudget::default(),
        }
    }
}

impl ScaleSelector {
    pub fn new(budget: ViewportBudget) -> Result<Self> {
        check_dimension("viewport max width", budget.max_width)?;
        check_dimension("viewport max height", budget.max_height)?;
        Ok(Self { budget })
    }

    pub fn budget(&self) -> ViewportBudget {
        self.budget
    }

    /// `min(max_width / w, max_height / h, 2.0)`
    ///
    /// A ratio that underflows to zero is clamped to `f64::MIN_POSITIVE`, so
    /// the result is always a valid [`RenderScale`].
    pub fn select(&self, page: &PageGeometry) -> RenderScale {
        let scale = (self.budget.max_width / page.width())
            .min(self.budget.max_height / page.height())
            .min(MAX_RENDER_SCALE)
            .max(f64::MIN_POSITIVE);
        RenderScale(scale)
    }

    /// Select from raw dimensions, validating them first.
    pub fn select_for(&self, native_width: f64, native_height: f64) -> Result<RenderScale> {
        let page = PageGeometry::new(native_width, native_height)?;
        Ok(self.select(&page))
    }
}
