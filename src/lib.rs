//! Amnesia Editor Library
//!
//! Visual editing pipeline for paginated documents: a page is split into a
//! graphics-only background and a layer of editable text objects, the user
//! edits the objects, and the edited layout is sent to a rendering service
//! that produces the new document.
//!
//! # Modules
//!
//! - `document`: Parsing-library seam (traits the editor consumes)
//! - `geometry`: Render scale selection and native ↔ editor coordinates
//! - `raster`: Graphics-only rasterization with scoped text suppression
//! - `extract`: Text runs from a page's text content stream
//! - `overlay`: Editable text objects in editor space
//! - `layout`: Layout model and serializer (the rendering-service contract)
//! - `export`: Rendering service client
//! - `session`: Page loading with stale-load protection
//! - `diff`: LCS sequence diff

pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod raster;
pub mod session;

pub use config::Config;
pub use error::{EditorError, Result};
