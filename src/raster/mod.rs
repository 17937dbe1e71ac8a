//! Page rasterization
//!
//! # Architecture
//!
//! ```text
//!   GraphicsOnlyRasterizer::render(page, scale)
//!          │
//!          ├─ allocate RasterSurface (per call, pixel budget checked)
//!          ├─ TextSuppression guard  ── text entry points become no-ops
//!          ├─ page.render(RenderContext { surface, viewport })
//!          └─ guard dropped          ── text entry points restored
//!          │
//!          ▼
//!   RenderedBackground { width, height, image: RasterImage }
//! ```

mod background;
mod rasterizer;
mod suppress;
mod surface;

pub use background::RasterImage;
pub use rasterizer::{GraphicsOnlyRasterizer, RenderedBackground, DEFAULT_MAX_SURFACE_PIXELS};
pub use suppress::TextSuppression;
pub use surface::{DrawingSurface, PixelRect, Point, RasterSurface};
