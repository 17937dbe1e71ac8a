//! Document-parsing library seam
//!
//! The editor never parses document bytes. It consumes a parsing library
//! through the traits in this module and only ever asks for page size, the
//! text content stream, annotations, and a render pass onto a surface it
//! provides.
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────────┐  open_document(bytes)  ┌──────────────────┐
//!   │  DocumentLoader  │ ─────────────────────▶ │  DocumentHandle  │
//!   └──────────────────┘                        │  page_count      │
//!                                               │  metadata        │
//!                                               └──────────────────┘
//!                                                        │ get_page(n)
//!                                                        ▼
//!   ┌──────────────────┐   render(ctx)          ┌──────────────────┐
//!   │  DrawingSurface  │ ◀───────────────────── │   PageHandle     │
//!   │  (caller-owned)  │                        │  viewport        │
//!   └──────────────────┘                        │  text_content    │
//!                                               │  annotations     │
//!                                               └──────────────────┘
//! ```

mod error;
mod signature;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{DocumentError, DocumentResult};
pub use signature::{detect_signatures, SIGNATURES_PRESENT_FLAG};
pub use traits::{DocumentHandle, DocumentLoader, PageHandle, RenderContext};
pub use types::{DocumentMetadata, PageAnnotation, TextContent, TextItem, Viewport};
