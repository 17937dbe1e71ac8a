//! Page geometry
//!
//! Scale selection and the mapping between the document's native coordinate
//! space and the editor's pixel space.

mod mapper;
mod scale;

pub use mapper::{CoordinateMapper, EditorBox, EditorPlacement, NativeBox, FALLBACK_FONT_FAMILY};
pub use scale::{PageGeometry, RenderScale, ScaleSelector, ViewportBudget, MAX_RENDER_SCALE};
