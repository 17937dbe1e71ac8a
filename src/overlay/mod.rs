//! Editable text overlay
//!
//! Editor-space objects created one-to-one from a page's text runs, plus any
//! objects the user adds. The editing surface drives this model; the layout
//! serializer reads it.

mod model;
mod object;

pub use model::OverlayModel;
pub use object::{
    ObjectId, ObjectPatch, OverlayObject, StyleDefaults, TextAlign, BLANK_FONT_FAMILY,
    BLANK_FONT_SIZE, BLANK_TEXT,
};
