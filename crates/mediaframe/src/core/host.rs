//! Host Environment Seams
//!
//! Traits through which the core reaches browser capabilities. A browser
//! binding implements these against the real DOM; tests use recording doubles.
//!
//! All methods run on the single event-loop thread of the embedded document;
//! the `Send + Sync` bounds only let the core hold hosts behind `Arc` inside
//! spawned timer tasks.

use async_trait::async_trait;

use super::events::WrapperEvent;
use super::resize::FrameMessage;
use super::ui::{AttributionView, ErrorPanel, HeaderView, ShellLayout, TranscriptPanelView};
use super::{CoreResult, Theme};

// =============================================================================
// Layout / Frame
// =============================================================================

/// One pass of layout measurements, in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Bounding-rectangle height of the wrapper root element
    pub root_height: f64,
    /// `document.body.scrollHeight`
    pub body_scroll_height: f64,
    /// `document.documentElement.scrollHeight`
    pub document_scroll_height: f64,
    /// `document.documentElement.offsetHeight`
    pub document_offset_height: f64,
    /// Window inner width
    pub viewport_width: f64,
}

/// Frame-level capabilities used by resize negotiation
pub trait FrameHost: Send + Sync {
    /// Whether the document is embedded in a parent frame (`window !== window.parent`)
    fn is_embedded(&self) -> bool;

    /// Takes a full set of layout measurements
    fn measure(&self) -> LayoutMetrics;

    /// Current window width; cheaper than a full [`FrameHost::measure`]
    fn viewport_width(&self) -> f64 {
        self.measure().viewport_width
    }

    /// Toggles the root's display off and on to discard cached layout
    fn force_reflow(&self);

    /// Posts to the parent frame with `*` target origin; fire-and-forget
    fn post_to_parent(&self, message: &FrameMessage);

    /// Whether a size observer is available; without one a width poll is used
    fn supports_size_observer(&self) -> bool {
        true
    }

    /// Whether the document contains H5P-flavored content
    fn contains_h5p_content(&self) -> bool {
        false
    }
}

// =============================================================================
// Document / UI
// =============================================================================

/// Opaque handle to the element content plugins render into
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRoot {
    pub element_id: String,
}

impl ContentRoot {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

/// Document-level capabilities used by the wrapper controller
pub trait DocumentHost: Send + Sync {
    /// Builds the wrapper shell and returns the content root
    fn build_structure(&self, layout: &ShellLayout) -> CoreResult<ContentRoot>;

    /// `prefers-contrast: more` / `forced-colors: active`
    fn prefers_high_contrast(&self) -> bool;

    /// `prefers-color-scheme: dark`
    fn prefers_dark_scheme(&self) -> bool;

    fn apply_theme(&self, theme: Theme);

    /// Sets the shell background colour after structure build; `None` clears it
    fn set_background_color(&self, color: Option<&str>);

    /// Renders (or re-renders) the header; `None` removes it
    fn render_header(&self, header: Option<&HeaderView>);

    /// Replaces the content area with an error panel
    fn render_error(&self, panel: &ErrorPanel);

    /// Appends the transcript panel (toggle button + collapsed panel)
    fn append_transcripts(&self, panel: &TranscriptPanelView);

    /// Sets `aria-hidden` on the transcript panel and `aria-expanded` on its toggle
    fn set_transcript_hidden(&self, hidden: bool);

    /// Shows fetched transcript text (already escaped)
    fn show_transcript_text(&self, language: &str, escaped_text: &str);

    /// Shows the inline "transcript unavailable" notice (already escaped)
    fn show_transcript_unavailable(&self, language: &str, escaped_message: &str);

    /// Appends the attribution block
    fn append_attribution(&self, attribution: &AttributionView);

    /// Dispatches a bubbling, composed event on the wrapper root and the document
    fn dispatch_event(&self, event: &WrapperEvent);
}

// =============================================================================
// I/O
// =============================================================================

/// Text fetcher for manifests and transcripts
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches a resource; non-success statuses are errors
    async fn fetch_text(&self, uri: &str) -> CoreResult<String>;
}

/// Dynamic script loader for optional support libraries
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Injects a script and resolves once its global is available
    async fn load_script(&self, uri: &str) -> CoreResult<()>;
}
