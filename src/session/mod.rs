//! Editor session
//!
//! Loads a document's first page into an editable state and exports the
//! result.
//!
//! # Architecture
//!
//! ```text
//!   load(bytes) ── generation N
//!      │
//!      ├─ DocumentLoader::open_document
//!      ├─ detect_signatures            (advisory)
//!      ├─ ScaleSelector::select
//!      ├─ try_join!
//!      │     ├─ GraphicsOnlyRasterizer::render   ── background
//!      │     └─ TextRunExtractor::extract        ── runs
//!      └─ lock ─ still generation N? ─ yes ─▶ publish page + OverlayModel
//!                                    └ no ──▶ Superseded (discard)
//! ```
//!
//! Loads may overlap. Only the most recently started one is ever published;
//! older ones, including their failures, are dropped on the floor.

mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ExtractionPolicy};
use crate::document::{detect_signatures, DocumentLoader, PageHandle};
use crate::error::{EditorError, Result};
use crate::export::LayoutExporter;
use crate::extract::{TextRun, TextRunExtractor};
use crate::geometry::{CoordinateMapper, PageGeometry, RenderScale, ScaleSelector};
use crate::layout::{LayoutModel, LayoutSerializer};
use crate::overlay::{OverlayModel, OverlayObject, StyleDefaults};
use crate::raster::{GraphicsOnlyRasterizer, RasterImage};

pub use state::{LoadOutcome, LoadState, LoadedPage};

// ============================================================================
// Session
// ============================================================================

/// Single-page editing session
#[derive(Clone)]
pub struct EditorSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    loader: Arc<dyn DocumentLoader>,
    selector: ScaleSelector,
    rasterizer: GraphicsOnlyRasterizer,
    extractor: TextRunExtractor,
    policy: ExtractionPolicy,
    defaults: StyleDefaults,

    /// Generation of the most recently started load
    generation: AtomicU64,

    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    load_state: LoadState,
    page: Option<ActivePage>,
    overlay: OverlayModel,
}

/// The page currently open for editing
struct ActivePage {
    document: Arc<Vec<u8>>,
    geometry: PageGeometry,
    scale: RenderScale,
    background: Arc<RasterImage>,
    digitally_signed: bool,
}

/// Everything a load produced, before it is published
struct PreparedPage {
    generation: u64,
    document: Arc<Vec<u8>>,
    geometry: PageGeometry,
    scale: RenderScale,
    background: RasterImage,
    overlay: OverlayModel,
    degraded: bool,
    digitally_signed: bool,
}

impl EditorSession {
    pub fn new(loader: Arc<dyn DocumentLoader>, config: &Config) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(SessionInner {
                loader,
                selector: ScaleSelector::new(config.viewport.budget())?,
                rasterizer: GraphicsOnlyRasterizer::new(config.viewport.max_surface_pixels),
                extractor: TextRunExtractor,
                policy: config.session.extraction_policy,
                defaults: StyleDefaults::default(),
                generation: AtomicU64::new(0),
                state: Mutex::new(SessionState::default()),
            }),
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    pub fn state(&self) -> LoadState {
        self.inner.state.lock().load_state.clone()
    }

    /// Generation of the most recently started load (0 before any load)
    pub fn current_generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load the document's first page.
    ///
    /// Returns [`LoadOutcome::Superseded`] when a newer load started while
    /// this one was in flight; in that case nothing in the session changed,
    /// whether this load succeeded or failed.
    pub async fn load(&self, document: Vec<u8>) -> Result<LoadOutcome> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.inner.state.lock();
            if self.is_current(generation) {
                state.load_state = LoadState::Loading { generation };
            }
        }
        info!(generation, bytes = document.len(), "Loading page");

        match self.prepare(generation, Arc::new(document)).await {
            Ok(prepared) => Ok(self.publish(prepared)),
            Err(e) => {
                let mut state = self.inner.state.lock();
                if !self.is_current(generation) {
                    debug!(generation, "Ignoring failure of superseded load: {}", e);
                    return Ok(LoadOutcome::Superseded { generation });
                }
                error!(generation, "Page load failed: {}", e);
                state.load_state = LoadState::Error {
                    generation,
                    message: e.to_string(),
                };
                state.page = None;
                state.overlay.clear();
                Err(e)
            }
        }
    }

    async fn prepare(&self, generation: u64, document: Arc<Vec<u8>>) -> Result<PreparedPage> {
        let doc = self.inner.loader.open_document(&document).await?;

        let digitally_signed = detect_signatures(doc.as_ref()).await;
        if digitally_signed {
            warn!(generation, "Document appears digitally signed; editing invalidates its signatures");
        }

        let page = doc.get_page(1).await?;
        let native = page.viewport(1.0);
        let geometry = PageGeometry::new(native.width, native.height)?;
        let scale = self.inner.selector.select(&geometry);
        debug!(
            generation,
            width = geometry.width(),
            height = geometry.height(),
            scale = scale.get(),
            "Selected render scale"
        );

        let (background, runs) = tokio::try_join!(
            self.inner.rasterizer.render(page.as_ref(), scale),
            self.extract_runs(generation, page.as_ref()),
        )?;

        let degraded = runs.is_none();
        let mapper = CoordinateMapper::new(geometry.height(), scale);
        let overlay = OverlayModel::from_runs(
            runs.unwrap_or_default(),
            &mapper,
            self.inner.defaults.clone(),
        )?;

        Ok(PreparedPage {
            generation,
            document,
            geometry,
            scale,
            background: background.image,
            overlay,
            degraded,
            digitally_signed,
        })
    }

    /// `None` means the text stream was unreadable and the policy allows a
    /// background-only page.
    async fn extract_runs(&self, generation: u64, page: &dyn PageHandle) -> Result<Option<Vec<TextRun>>> {
        match self.inner.extractor.extract(page).await {
            Ok(runs) => Ok(Some(runs.collect())),
            Err(e) if self.inner.policy == ExtractionPolicy::BackgroundOnly => {
                warn!(generation, "Text extraction failed, showing background only: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn publish(&self, prepared: PreparedPage) -> LoadOutcome {
        let generation = prepared.generation;
        let degraded = prepared.degraded;
        let overlay = prepared.overlay;
        let background = Arc::new(prepared.background);

        let mut state = self.inner.state.lock();
        if !self.is_current(generation) {
            debug!(generation, "Discarding superseded load");
            return LoadOutcome::Superseded { generation };
        }

        let object_count = overlay.len();
        state.overlay.replace_with(overlay);
        state.page = Some(ActivePage {
            document: prepared.document,
            geometry: prepared.geometry,
            scale: prepared.scale,
            background: background.clone(),
            digitally_signed: prepared.digitally_signed,
        });
        state.load_state = LoadState::Ready {
            generation,
            degraded,
        };
        info!(generation, objects = object_count, degraded, "Page ready");

        LoadOutcome::Applied(LoadedPage {
            generation,
            geometry: prepared.geometry,
            scale: prepared.scale,
            background,
            object_count,
            digitally_signed: prepared.digitally_signed,
            degraded,
        })
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Run a mutation against the overlay under the session lock.
    pub fn with_overlay<R>(&self, f: impl FnOnce(&mut OverlayModel) -> R) -> R {
        let mut state = self.inner.state.lock();
        f(&mut state.overlay)
    }

    pub fn objects(&self) -> Vec<OverlayObject> {
        self.inner.state.lock().overlay.objects().to_vec()
    }

    pub fn background(&self) -> Option<Arc<RasterImage>> {
        let state = self.inner.state.lock();
        state.page.as_ref().map(|p| p.background.clone())
    }

    /// Background as a PNG data URL, encoded off the async runtime.
    pub async fn background_data_url(&self) -> Result<Option<String>> {
        let Some(background) = self.background() else {
            return Ok(None);
        };
        tokio::task::spawn_blocking(move || background.to_data_url())
            .await
            .map_err(|e| EditorError::RenderFailure(format!("Task join error: {}", e)))?
            .map(Some)
    }

    pub fn is_digitally_signed(&self) -> bool {
        let state = self.inner.state.lock();
        state.page.as_ref().is_some_and(|p| p.digitally_signed)
    }

    // ========================================================================
    // Export
    // ========================================================================

    fn snapshot(&self) -> Result<(Arc<Vec<u8>>, LayoutModel)> {
        let state = self.inner.state.lock();
        let page = state
            .page
            .as_ref()
            .ok_or_else(|| EditorError::SerializationError("no page is loaded".to_string()))?;
        let layout = LayoutSerializer::new(page.geometry, page.scale).serialize(&state.overlay)?;
        Ok((page.document.clone(), layout))
    }

    /// Layout of the current edited state.
    pub fn layout(&self) -> Result<LayoutModel> {
        self.snapshot().map(|(_, layout)| layout)
    }

    /// Send the original document and the current layout to the exporter.
    pub async fn export(&self, exporter: &dyn LayoutExporter) -> Result<Vec<u8>> {
        let (document, layout) = self.snapshot()?;
        exporter.export(document.as_ref().clone(), &layout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fake::{FakeDocument, FakeLoader, FakePage, Gate};
    use crate::document::{DocumentError, TextItem, SIGNATURES_PRESENT_FLAG};
    use crate::overlay::ObjectPatch;
    use async_trait::async_trait;

    fn session_with(loader: FakeLoader, policy: ExtractionPolicy) -> EditorSession {
        let mut config = Config::default();
        config.session.extraction_policy = policy;
        EditorSession::new(Arc::new(loader), &config).unwrap()
    }

    fn page_with(texts: &[&str]) -> FakePage {
        let items = texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextItem::at(t, 72.0, 700.0 - 20.0 * i as f64, 12.0))
            .collect();
        FakePage::letter().with_items(items)
    }

    fn texts(session: &EditorSession) -> Vec<String> {
        session.objects().into_iter().map(|o| o.text).collect()
    }

    #[tokio::test]
    async fn test_load_publishes_page() {
        let loader = FakeLoader::default()
            .with_document(b"doc", FakeDocument::single(page_with(&["Hello", " ", "World"])));
        let session = session_with(loader, ExtractionPolicy::Fail);
        assert_eq!(session.state(), LoadState::Idle);

        let outcome = session.load(b"doc".to_vec()).await.unwrap();
        let LoadOutcome::Applied(page) = outcome else {
            panic!("load was not applied");
        };
        assert_eq!(page.generation, 1);
        assert_eq!(page.object_count, 2);
        assert!(!page.degraded);
        assert!(!page.digitally_signed);
        assert_eq!(page.background.width(), (612.0 * page.scale.get()).ceil() as u32);
        assert_eq!(texts(&session), vec!["Hello", "World"]);
        assert_eq!(
            session.state(),
            LoadState::Ready {
                generation: 1,
                degraded: false
            }
        );
        assert!(session.background_data_url().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_superseded_load_never_touches_overlay() {
        let gate = Gate::default();
        let loader = FakeLoader::default()
            .with_document(
                b"slow",
                FakeDocument::single(page_with(&["stale"]).gated(gate.clone())),
            )
            .with_document(b"fast", FakeDocument::single(page_with(&["fresh"])));
        let session = session_with(loader, ExtractionPolicy::Fail);

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.load(b"slow".to_vec()).await })
        };
        gate.entered.notified().await;

        let fast = session.load(b"fast".to_vec()).await.unwrap();
        assert!(fast.is_applied());

        gate.release.notify_one();
        let slow = slow.await.unwrap().unwrap();
        assert!(matches!(slow, LoadOutcome::Superseded { generation: 1 }));

        assert_eq!(texts(&session), vec!["fresh"]);
        assert_eq!(
            session.state(),
            LoadState::Ready {
                generation: 2,
                degraded: false
            }
        );
    }

    #[tokio::test]
    async fn test_superseded_failure_is_ignored() {
        let gate = Gate::default();
        let loader = FakeLoader::default()
            .with_document(
                b"slow",
                FakeDocument::single(
                    page_with(&["stale"])
                        .failing_text("stream truncated")
                        .gated(gate.clone()),
                ),
            )
            .with_document(b"fast", FakeDocument::single(page_with(&["fresh"])));
        let session = session_with(loader, ExtractionPolicy::Fail);

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.load(b"slow".to_vec()).await })
        };
        gate.entered.notified().await;
        session.load(b"fast".to_vec()).await.unwrap();
        gate.release.notify_one();

        assert!(matches!(
            slow.await.unwrap(),
            Ok(LoadOutcome::Superseded { generation: 1 })
        ));
        assert!(session.state().is_ready());
        assert_eq!(texts(&session), vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_extraction_failure_fails_load_by_default() {
        let loader = FakeLoader::default().with_document(
            b"doc",
            FakeDocument::single(page_with(&["x"]).failing_text("bad stream")),
        );
        let session = session_with(loader, ExtractionPolicy::Fail);

        let err = session.load(b"doc".to_vec()).await.unwrap_err();
        assert!(matches!(err, EditorError::ExtractionFailure(_)));
        assert!(matches!(session.state(), LoadState::Error { generation: 1, .. }));
        assert!(session.layout().is_err());
    }

    #[tokio::test]
    async fn test_background_only_policy_degrades() {
        let loader = FakeLoader::default().with_document(
            b"doc",
            FakeDocument::single(page_with(&["x"]).failing_text("bad stream")),
        );
        let session = session_with(loader, ExtractionPolicy::BackgroundOnly);

        let LoadOutcome::Applied(page) = session.load(b"doc".to_vec()).await.unwrap() else {
            panic!("load was not applied");
        };
        assert!(page.degraded);
        assert_eq!(page.object_count, 0);
        assert_eq!(
            session.state(),
            LoadState::Ready {
                generation: 1,
                degraded: true
            }
        );
    }

    #[tokio::test]
    async fn test_render_failure_fails_load() {
        let loader = FakeLoader::default().with_document(
            b"doc",
            FakeDocument::single(page_with(&["x"]).failing_render("bad operator")),
        );
        let session = session_with(loader, ExtractionPolicy::BackgroundOnly);

        let err = session.load(b"doc".to_vec()).await.unwrap_err();
        assert!(matches!(err, EditorError::RenderFailure(_)));
    }

    #[tokio::test]
    async fn test_non_finite_run_fails_load() {
        let page = FakePage::letter().with_items(vec![TextItem::at("Lost", f64::NAN, 700.0, 12.0)]);
        let loader = FakeLoader::default().with_document(b"doc", FakeDocument::single(page));
        let session = session_with(loader, ExtractionPolicy::Fail);

        let err = session.load(b"doc".to_vec()).await.unwrap_err();
        assert!(matches!(err, EditorError::InvalidGeometry(_)));
        assert!(matches!(session.state(), LoadState::Error { generation: 1, .. }));
        assert!(session.objects().is_empty());
    }

    #[tokio::test]
    async fn test_encrypted_document() {
        let session = session_with(FakeLoader::default(), ExtractionPolicy::Fail);
        let err = session.load(b"%PDF-encrypted".to_vec()).await.unwrap_err();
        assert!(matches!(err, EditorError::Document(DocumentError::Encrypted)));
    }

    #[tokio::test]
    async fn test_signature_reported() {
        let loader = FakeLoader::default().with_document(
            b"signed",
            FakeDocument::single(page_with(&["Contract"])).with_info_flag(SIGNATURES_PRESENT_FLAG),
        );
        let session = session_with(loader, ExtractionPolicy::Fail);

        let LoadOutcome::Applied(page) = session.load(b"signed".to_vec()).await.unwrap() else {
            panic!("load was not applied");
        };
        assert!(page.digitally_signed);
        assert!(session.is_digitally_signed());
    }

    struct CapturingExporter {
        seen: Mutex<Option<(Vec<u8>, LayoutModel)>>,
    }

    #[async_trait]
    impl LayoutExporter for CapturingExporter {
        async fn export(&self, document: Vec<u8>, layout: &LayoutModel) -> Result<Vec<u8>> {
            *self.seen.lock() = Some((document, layout.clone()));
            Ok(b"%PDF-edited".to_vec())
        }
    }

    #[tokio::test]
    async fn test_export_uses_native_units() {
        let page = FakePage::new(1600.0, 2000.0)
            .with_items(vec![TextItem::at("Heading", 100.0, 1800.0, 40.0)]);
        let loader = FakeLoader::default().with_document(b"big", FakeDocument::single(page));
        let session = session_with(loader, ExtractionPolicy::Fail);

        let LoadOutcome::Applied(loaded) = session.load(b"big".to_vec()).await.unwrap() else {
            panic!("load was not applied");
        };
        assert_eq!(loaded.scale.get(), 0.5);

        let id = session.objects()[0].id;
        session
            .with_overlay(|overlay| overlay.update(id, ObjectPatch::moved_to(100.0, 50.0)).map(|_| ()))
            .unwrap();

        let exporter = CapturingExporter {
            seen: Mutex::new(None),
        };
        let output = session.export(&exporter).await.unwrap();
        assert_eq!(output, b"%PDF-edited".to_vec());

        let (document, layout) = exporter.seen.lock().take().unwrap();
        assert_eq!(document, b"big".to_vec());
        assert_eq!(layout.page_width, 1600.0);
        let object = &layout.objects[0];
        assert_eq!(object.x, 200.0);
        assert_eq!(object.y, 2000.0 - 100.0 - 40.0);
        assert_eq!(object.font_size, 40.0);
        assert_eq!(object.font_family, "sans-serif");
    }
}
