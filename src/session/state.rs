//! Page load state

use std::sync::Arc;

use serde::Serialize;

use crate::geometry::{PageGeometry, RenderScale};
use crate::raster::RasterImage;

/// Lifecycle of the session's page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        generation: u64,
    },
    Ready {
        generation: u64,
        /// Background shown without editable text
        degraded: bool,
    },
    Error {
        generation: u64,
        message: String,
    },
}

impl LoadState {
    pub fn generation(&self) -> Option<u64> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading { generation }
            | LoadState::Ready { generation, .. }
            | LoadState::Error { generation, .. } => Some(*generation),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }
}

/// Summary of a page load that was applied to the session
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub generation: u64,
    pub geometry: PageGeometry,
    pub scale: RenderScale,
    pub background: Arc<RasterImage>,
    pub object_count: usize,
    /// Editing will invalidate existing signatures
    pub digitally_signed: bool,
    pub degraded: bool,
}

/// Result of [`EditorSession::load`](super::EditorSession::load)
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The load was current and its page is now live
    Applied(LoadedPage),
    /// A newer load started first; nothing was changed
    Superseded { generation: u64 },
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied(_))
    }
}
