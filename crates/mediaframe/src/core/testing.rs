//! Recording test doubles for the host seams

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::config::ContentConfig;
use super::controller::WrapperEnvironment;
use super::events::WrapperEvent;
use super::host::{AssetLoader, ContentRoot, DocumentHost, FrameHost, LayoutMetrics, ResourceFetcher};
use super::plugin::{Cleanup, ContentPlugin, PluginContext};
use super::resize::FrameMessage;
use super::ui::{AttributionView, ErrorPanel, HeaderView, ShellLayout, TranscriptPanelView};
use super::{ContentType, CoreResult, Theme, WrapperError};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Frame
// =============================================================================

pub struct MockFrameHost {
    embedded: bool,
    size_observer: bool,
    h5p: bool,
    metrics: Mutex<LayoutMetrics>,
    posted: Mutex<Vec<FrameMessage>>,
    measures: AtomicUsize,
    reflows: AtomicUsize,
}

impl MockFrameHost {
    /// Embedded frame where every height source reports `height`
    pub fn new(height: f64, width: f64) -> Self {
        Self {
            embedded: true,
            size_observer: true,
            h5p: false,
            metrics: Mutex::new(LayoutMetrics {
                root_height: height,
                body_scroll_height: height,
                document_scroll_height: height,
                document_offset_height: height,
                viewport_width: width,
            }),
            posted: Mutex::new(Vec::new()),
            measures: AtomicUsize::new(0),
            reflows: AtomicUsize::new(0),
        }
    }

    /// Top-level document, not inside a frame
    pub fn detached(mut self) -> Self {
        self.embedded = false;
        self
    }

    pub fn with_h5p_content(mut self) -> Self {
        self.h5p = true;
        self
    }

    pub fn without_size_observer(mut self) -> Self {
        self.size_observer = false;
        self
    }

    pub fn set_height(&self, height: f64) {
        let mut metrics = lock(&self.metrics);
        metrics.root_height = height;
        metrics.body_scroll_height = height;
        metrics.document_scroll_height = height;
        metrics.document_offset_height = height;
    }

    pub fn set_width(&self, width: f64) {
        lock(&self.metrics).viewport_width = width;
    }

    pub fn posted(&self) -> Vec<FrameMessage> {
        lock(&self.posted).clone()
    }

    pub fn posted_heights(&self) -> Vec<u32> {
        lock(&self.posted).iter().map(|m| m.height).collect()
    }

    pub fn measure_count(&self) -> usize {
        self.measures.load(Ordering::SeqCst)
    }

    pub fn reflow_count(&self) -> usize {
        self.reflows.load(Ordering::SeqCst)
    }
}

impl FrameHost for MockFrameHost {
    fn is_embedded(&self) -> bool {
        self.embedded
    }

    fn measure(&self) -> LayoutMetrics {
        self.measures.fetch_add(1, Ordering::SeqCst);
        *lock(&self.metrics)
    }

    fn viewport_width(&self) -> f64 {
        lock(&self.metrics).viewport_width
    }

    fn force_reflow(&self) {
        self.reflows.fetch_add(1, Ordering::SeqCst);
    }

    fn post_to_parent(&self, message: &FrameMessage) {
        lock(&self.posted).push(message.clone());
    }

    fn supports_size_observer(&self) -> bool {
        self.size_observer
    }

    fn contains_h5p_content(&self) -> bool {
        self.h5p
    }
}

// =============================================================================
// Document
// =============================================================================

#[derive(Default)]
struct DocumentLog {
    prefers_dark: bool,
    prefers_high_contrast: bool,
    structures: usize,
    themes: Vec<Theme>,
    backgrounds: Vec<Option<String>>,
    headers: Vec<Option<HeaderView>>,
    errors: Vec<ErrorPanel>,
    transcript_panels: usize,
    transcript_hidden: Vec<bool>,
    transcript_texts: Vec<(String, String)>,
    transcript_unavailable: Vec<(String, String)>,
    attributions: usize,
    events: Vec<&'static str>,
}

#[derive(Default)]
pub struct MockDocumentHost {
    fail_structure: bool,
    log: Mutex<DocumentLog>,
}

impl MockDocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_structure(mut self) -> Self {
        self.fail_structure = true;
        self
    }

    pub fn set_prefers_dark(&self, value: bool) {
        lock(&self.log).prefers_dark = value;
    }

    pub fn set_prefers_high_contrast(&self, value: bool) {
        lock(&self.log).prefers_high_contrast = value;
    }

    pub fn structures_built(&self) -> usize {
        lock(&self.log).structures
    }

    pub fn applied_themes(&self) -> Vec<Theme> {
        lock(&self.log).themes.clone()
    }

    pub fn background_colors(&self) -> Vec<Option<String>> {
        lock(&self.log).backgrounds.clone()
    }

    pub fn headers(&self) -> Vec<Option<HeaderView>> {
        lock(&self.log).headers.clone()
    }

    pub fn errors(&self) -> Vec<ErrorPanel> {
        lock(&self.log).errors.clone()
    }

    pub fn transcript_panels(&self) -> usize {
        lock(&self.log).transcript_panels
    }

    pub fn transcript_hidden_calls(&self) -> Vec<bool> {
        lock(&self.log).transcript_hidden.clone()
    }

    pub fn transcript_texts(&self) -> Vec<(String, String)> {
        lock(&self.log).transcript_texts.clone()
    }

    pub fn transcript_unavailable(&self) -> Vec<(String, String)> {
        lock(&self.log).transcript_unavailable.clone()
    }

    pub fn attributions(&self) -> usize {
        lock(&self.log).attributions
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        lock(&self.log).events.clone()
    }
}

impl DocumentHost for MockDocumentHost {
    fn build_structure(&self, _layout: &ShellLayout) -> CoreResult<ContentRoot> {
        if self.fail_structure {
            return Err(WrapperError::Structure("wrapper root missing".into()));
        }
        lock(&self.log).structures += 1;
        Ok(ContentRoot::new("wrapper-content"))
    }

    fn prefers_high_contrast(&self) -> bool {
        lock(&self.log).prefers_high_contrast
    }

    fn prefers_dark_scheme(&self) -> bool {
        lock(&self.log).prefers_dark
    }

    fn apply_theme(&self, theme: Theme) {
        lock(&self.log).themes.push(theme);
    }

    fn set_background_color(&self, color: Option<&str>) {
        lock(&self.log).backgrounds.push(color.map(str::to_string));
    }

    fn render_header(&self, header: Option<&HeaderView>) {
        lock(&self.log).headers.push(header.cloned());
    }

    fn render_error(&self, panel: &ErrorPanel) {
        lock(&self.log).errors.push(panel.clone());
    }

    fn append_transcripts(&self, _panel: &TranscriptPanelView) {
        lock(&self.log).transcript_panels += 1;
    }

    fn set_transcript_hidden(&self, hidden: bool) {
        lock(&self.log).transcript_hidden.push(hidden);
    }

    fn show_transcript_text(&self, language: &str, escaped_text: &str) {
        lock(&self.log)
            .transcript_texts
            .push((language.to_string(), escaped_text.to_string()));
    }

    fn show_transcript_unavailable(&self, language: &str, escaped_message: &str) {
        lock(&self.log)
            .transcript_unavailable
            .push((language.to_string(), escaped_message.to_string()));
    }

    fn append_attribution(&self, _attribution: &AttributionView) {
        lock(&self.log).attributions += 1;
    }

    fn dispatch_event(&self, event: &WrapperEvent) {
        lock(&self.log).events.push(event.name());
    }
}

// =============================================================================
// I/O
// =============================================================================

/// In-memory fetcher; unknown URIs behave like a 404
#[derive(Default)]
pub struct MockFetcher {
    bodies: HashMap<String, String>,
    statuses: HashMap<String, u16>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, uri: &str, body: &str) -> Self {
        self.bodies.insert(uri.to_string(), body.to_string());
        self
    }

    pub fn with_status(mut self, uri: &str, status: u16) -> Self {
        self.statuses.insert(uri.to_string(), status);
        self
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn fetch_text(&self, uri: &str) -> CoreResult<String> {
        if let Some(status) = self.statuses.get(uri) {
            return Err(WrapperError::ManifestFetch {
                uri: uri.to_string(),
                reason: format!("HTTP {}", status),
            });
        }
        self.bodies
            .get(uri)
            .cloned()
            .ok_or_else(|| WrapperError::ManifestFetch {
                uri: uri.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

pub struct MockAssetLoader {
    delay: Duration,
    fail: bool,
    loads: AtomicUsize,
}

impl MockAssetLoader {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            delay: Duration::ZERO,
            fail: true,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for MockAssetLoader {
    async fn load_script(&self, uri: &str) -> CoreResult<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(WrapperError::OptionalAsset(format!("{} failed to load", uri)));
        }
        Ok(())
    }
}

// =============================================================================
// Plugins
// =============================================================================

/// Records the sources it was asked to render; its cleanup bumps `cleanups`
pub struct RecordingPlugin {
    content_type: ContentType,
    loads: Mutex<Vec<String>>,
    pub cleanups: Arc<AtomicUsize>,
}

impl RecordingPlugin {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            loads: Mutex::new(Vec::new()),
            cleanups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn loads(&self) -> Vec<String> {
        lock(&self.loads).clone()
    }
}

#[async_trait]
impl ContentPlugin for RecordingPlugin {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    async fn load(&self, ctx: &PluginContext, config: &ContentConfig) -> CoreResult<Option<Cleanup>> {
        lock(&self.loads).push(config.src.clone());
        ctx.request_resize();

        let cleanups = self.cleanups.clone();
        Ok(Some(Box::new(move || {
            cleanups.fetch_add(1, Ordering::SeqCst);
        })))
    }
}

pub struct FailingPlugin {
    content_type: ContentType,
    message: String,
}

impl FailingPlugin {
    pub fn new(content_type: ContentType, message: &str) -> Self {
        Self {
            content_type,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ContentPlugin for FailingPlugin {
    fn content_type(&self) -> ContentType {
        self.content_type
    }

    async fn load(&self, _ctx: &PluginContext, _config: &ContentConfig) -> CoreResult<Option<Cleanup>> {
        Err(WrapperError::PluginLoad(self.message.clone()))
    }
}

/// Environment over the given doubles, with an instant asset loader
pub fn environment(
    frame: Arc<MockFrameHost>,
    document: Arc<MockDocumentHost>,
    fetcher: MockFetcher,
) -> WrapperEnvironment {
    WrapperEnvironment {
        frame,
        document,
        fetcher: Arc::new(fetcher),
        assets: Arc::new(MockAssetLoader::with_delay(Duration::ZERO)),
    }
}
