//! Wrapper Controller Implementation
//!
//! Initialization is strictly sequential for one wrapper instance. Nothing
//! thrown by an internal step leaves [`WrapperController::initialize`]:
//! failures become error panels, warnings, or degraded features.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::lifecycle::LifecycleState;
use crate::core::config::{ConfigResolver, Configuration, ManifestOutcome, QueryParams};
use crate::core::events::{ReadyEvent, ThemeChangeEvent, WrapperEvent};
use crate::core::host::{AssetLoader, ContentRoot, DocumentHost, FrameHost, ResourceFetcher};
use crate::core::options::WrapperOptions;
use crate::core::plugin::{CapabilityLoader, Cleanup, PluginContext, PluginRegistry};
use crate::core::resize::{ArmedTriggers, InboundMessage, ReportAction, ResizeNegotiator, ResizeTrigger};
use crate::core::theme::ThemeState;
use crate::core::ui::{
    default_transcript, escape_html, AttributionView, ErrorPanel, HeaderView, ShellLayout,
    TranscriptPanelView, TranscriptToggle,
};
use crate::core::{ContentType, CoreResult, WrapperError};

/// Host capabilities a controller runs against
#[derive(Clone)]
pub struct WrapperEnvironment {
    pub frame: Arc<dyn FrameHost>,
    pub document: Arc<dyn DocumentHost>,
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub assets: Arc<dyn AssetLoader>,
}

/// Root orchestrator for one embedded wrapper
pub struct WrapperController {
    env: WrapperEnvironment,
    options: WrapperOptions,
    resolver: ConfigResolver,
    registry: PluginRegistry,
    negotiator: Arc<ResizeNegotiator>,
    capabilities: Arc<CapabilityLoader>,

    state: LifecycleState,
    params: QueryParams,
    content_root: Option<ContentRoot>,
    /// Background the shell was built with
    shell_background: Option<String>,
    theme: Option<ThemeState>,
    config: Option<Configuration>,

    transcript_toggle: TranscriptToggle,
    transcripts_appended: bool,
    attribution_appended: bool,

    armed: Option<ArmedTriggers>,
    h5p_burst: Option<JoinHandle<()>>,
    cleanup: Option<Cleanup>,
}

impl WrapperController {
    /// Creates a controller; nothing touches the host until [`Self::initialize`]
    pub fn new(env: WrapperEnvironment, registry: PluginRegistry, mut options: WrapperOptions) -> Self {
        options.normalize();
        let negotiator = ResizeNegotiator::new(env.frame.clone(), options.resize.clone());
        let capabilities = Arc::new(CapabilityLoader::new(env.assets.clone(), options.assets.clone()));

        Self {
            resolver: ConfigResolver::new(options.defaults.clone()),
            env,
            options,
            registry,
            negotiator,
            capabilities,
            state: LifecycleState::Uninitialized,
            params: QueryParams::default(),
            content_root: None,
            shell_background: None,
            theme: None,
            config: None,
            transcript_toggle: TranscriptToggle::default(),
            transcripts_appended: false,
            attribution_appended: false,
            armed: None,
            h5p_burst: None,
            cleanup: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Final configuration, once resolved
    pub fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    pub fn options(&self) -> &WrapperOptions {
        &self.options
    }

    /// Shared negotiator, for wiring host observers to [`ResizeNegotiator::handle`]
    pub fn negotiator(&self) -> &Arc<ResizeNegotiator> {
        &self.negotiator
    }

    pub fn theme(&self) -> Option<&ThemeState> {
        self.theme.as_ref()
    }

    pub fn transcript_hidden(&self) -> bool {
        self.transcript_toggle.is_hidden()
    }

    /// Whether any timer-driven resize source is still running
    pub fn polling_active(&self) -> bool {
        let running = |h: &Option<JoinHandle<()>>| h.as_ref().is_some_and(|h| !h.is_finished());
        self.armed
            .as_ref()
            .is_some_and(|a| running(&a.initial_burst) || running(&a.width_poll))
            || running(&self.h5p_burst)
    }

    /// Handle passed to content plugins
    pub fn plugin_context(&self) -> Option<PluginContext> {
        self.content_root.as_ref().map(|root| {
            PluginContext::new(
                root.clone(),
                self.negotiator.clone(),
                self.env.document.clone(),
                self.capabilities.clone(),
            )
        })
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Runs the initialization sequence for a query string.
    ///
    /// Always returns the resulting state; never fails.
    pub async fn initialize(&mut self, query: &str) -> LifecycleState {
        if self.state != LifecycleState::Uninitialized {
            warn!(state = %self.state, "Wrapper already initialized");
            return self.state;
        }

        self.params = QueryParams::parse(query);

        if let Err(e) = self.build_structure() {
            self.fail(e);
            return self.state;
        }
        self.arm_resize();

        let config = match self.resolve_configuration().await {
            Ok(config) => config,
            Err(e) => {
                self.fail(e);
                return self.state;
            }
        };
        self.advance(LifecycleState::ConfigFinal);
        self.apply_final_config(config.clone());

        self.dispatch_content(&config).await;
        self.append_auxiliary_ui(&config).await;

        self.advance(LifecycleState::Ready);
        self.env
            .document
            .dispatch_event(&WrapperEvent::Ready(ReadyEvent { config }));
        // Content and auxiliary UI changed the layout.
        self.negotiator.report_debounced();

        self.state
    }

    fn build_structure(&mut self) -> CoreResult<()> {
        let layout = ShellLayout {
            background_color: self
                .params
                .background_color
                .clone()
                .or_else(|| self.options.defaults.background_color.clone()),
        };
        let root = self.env.document.build_structure(&layout)?;
        debug!(content_root = %root.element_id, "Wrapper structure built");
        self.content_root = Some(root);
        self.shell_background = layout.background_color;
        self.advance(LifecycleState::StructureBuilt);

        let preference = self.params.theme.unwrap_or(self.options.defaults.theme);
        self.theme = Some(ThemeState::init(preference, self.env.document.as_ref()));
        Ok(())
    }

    fn arm_resize(&mut self) {
        self.armed = Some(self.negotiator.arm());
        self.advance(LifecycleState::ResizeArmed);
    }

    /// URL pass first (renders the header immediately), then the manifest pass if referenced
    async fn resolve_configuration(&mut self) -> CoreResult<Configuration> {
        let initial = self.resolver.resolve_initial(&self.params);
        if let Ok(config) = &initial {
            self.env
                .document
                .render_header(HeaderView::from_config(config).as_ref());
        }

        let Some(uri) = self.params.manifest.clone() else {
            return initial;
        };

        self.advance(LifecycleState::ManifestPending);
        info!(manifest = %uri, "Fetching manifest");

        match self
            .resolver
            .resolve_manifest(self.env.fetcher.as_ref(), &self.params, &uri)
            .await
        {
            ManifestOutcome::Resolved { config, .. } => {
                self.env
                    .document
                    .render_header(HeaderView::from_config(&config).as_ref());
                Ok(config)
            }
            // URL configuration stays in effect; without one the manifest failure is the cause.
            ManifestOutcome::Degraded { error } => initial.map_err(|_| error),
        }
    }

    fn apply_final_config(&mut self, config: Configuration) {
        // Manifest presentation fields arrive after structure build; the URL already pinned its own.
        if let Some(theme) = self.theme.as_ref() {
            if self.params.theme.is_none() && config.theme != theme.preference() {
                let previous = theme.current();
                let next = ThemeState::init(config.theme, self.env.document.as_ref());
                if next.current() != previous {
                    self.emit_theme_change(next.current());
                }
                self.theme = Some(next);
            }
        }
        if config.background_color != self.shell_background {
            self.env
                .document
                .set_background_color(config.background_color.as_deref());
            self.shell_background = config.background_color.clone();
        }
        self.config = Some(config);
    }

    async fn dispatch_content(&mut self, config: &Configuration) {
        let Some(ctx) = self.plugin_context() else {
            return;
        };

        let result = match self.registry.get(config.content_type) {
            Some(plugin) => plugin.load(&ctx, &config.content_slice()).await,
            None => Err(WrapperError::PluginNotRegistered(config.content_type)),
        };

        match result {
            Ok(cleanup) => {
                debug!(content_type = %config.content_type, "Content plugin loaded");
                self.cleanup = cleanup;
            }
            Err(e) => {
                let error = match e {
                    WrapperError::PluginLoad(_) | WrapperError::PluginNotRegistered(_) => e,
                    other => WrapperError::PluginLoad(other.to_string()),
                };
                warn!(content_type = %config.content_type, error = %error, "Content plugin failed");
                self.env.document.render_error(&ErrorPanel::from_error(&error));
            }
        }

        self.h5p_burst = self
            .negotiator
            .arm_h5p_fallback(config.content_type == ContentType::H5p);
    }

    /// Appends attribution and transcripts; never replaces existing structure
    async fn append_auxiliary_ui(&mut self, config: &Configuration) {
        if !self.attribution_appended {
            if let Some(view) = config
                .attribution
                .as_ref()
                .and_then(AttributionView::from_attribution)
            {
                self.env.document.append_attribution(&view);
                self.attribution_appended = true;
            }
        }

        if !self.transcripts_appended {
            if let Some(panel) = TranscriptPanelView::from_transcripts(&config.transcripts) {
                self.env.document.append_transcripts(&panel);
                self.transcripts_appended = true;

                if let Some(language) = default_transcript(&config.transcripts).map(|t| t.language.clone()) {
                    // Failure is rendered inside the panel only.
                    let _ = self.load_transcript(&language).await;
                }
            }
        }
    }

    fn advance(&mut self, next: LifecycleState) {
        let from = self.state;
        match self.state.transition(next) {
            Ok(()) => info!(from = %from, to = %next, "Wrapper lifecycle"),
            Err(e) => warn!(error = %e, "Ignoring lifecycle transition"),
        }
    }

    fn fail(&mut self, error: WrapperError) {
        warn!(error = %error, kind = ?error.kind(), "Wrapper initialization stopped");
        self.env.document.render_error(&ErrorPanel::from_error(&error));
        self.advance(LifecycleState::Error);
    }

    // =========================================================================
    // Runtime Operations
    // =========================================================================

    /// Routes a browser-side event to the negotiator
    pub fn handle_trigger(&self, trigger: &ResizeTrigger) -> ReportAction {
        self.negotiator.handle(trigger)
    }

    /// Handles a cross-frame `message` event payload
    pub fn handle_message(&self, data: &Value) -> ReportAction {
        self.handle_trigger(&ResizeTrigger::Message(InboundMessage::classify(data)))
    }

    /// System color-scheme or contrast preference changed
    pub fn on_system_theme_change(&mut self) {
        let Some(theme) = self.theme.as_mut() else {
            return;
        };
        if let Some(next) = theme.on_system_change(self.env.document.as_ref()) {
            self.emit_theme_change(next);
        }
    }

    fn emit_theme_change(&self, theme: crate::core::Theme) {
        debug!(%theme, "Theme changed");
        self.env
            .document
            .dispatch_event(&WrapperEvent::ThemeChange(ThemeChangeEvent { theme }));
        self.negotiator.report_debounced();
    }

    /// Flips the transcript panel; returns the new `aria-hidden` value, or `None` without a panel
    pub fn toggle_transcript(&mut self) -> Option<bool> {
        if !self.transcripts_appended {
            return None;
        }
        let hidden = self.transcript_toggle.toggle();
        self.env.document.set_transcript_hidden(hidden);
        self.handle_trigger(&ResizeTrigger::TranscriptToggled);
        self.track(
            if hidden { "transcript_hide" } else { "transcript_show" },
            "transcript",
            None,
        );
        Some(hidden)
    }

    /// Fetches one transcript into the panel; failures show an inline notice
    pub async fn load_transcript(&self, language: &str) -> CoreResult<()> {
        let Some(transcript) = self
            .config
            .as_ref()
            .and_then(|c| c.transcripts.iter().find(|t| t.language == language))
        else {
            let error = WrapperError::TranscriptFetch {
                language: language.to_string(),
                reason: "no transcript for this language".to_string(),
            };
            self.env
                .document
                .show_transcript_unavailable(language, &escape_html(&error.to_string()));
            return Err(error);
        };

        match self.env.fetcher.fetch_text(&transcript.uri).await {
            Ok(text) => {
                self.env
                    .document
                    .show_transcript_text(language, &escape_html(&text));
                self.negotiator.report_debounced();
                Ok(())
            }
            Err(e) => {
                let error = WrapperError::TranscriptFetch {
                    language: language.to_string(),
                    reason: e.to_string(),
                };
                warn!(language, error = %error, "Transcript unavailable");
                self.env
                    .document
                    .show_transcript_unavailable(language, &escape_html("Transcript unavailable."));
                Err(error)
            }
        }
    }

    /// Records an analytics event
    pub fn track(&self, action: &str, category: &str, label: Option<&str>) {
        if let Some(ctx) = self.plugin_context() {
            ctx.track(action, category, label);
        }
    }

    /// Clears the pending resize timer, detaches the theme listener, and runs
    /// the plugin's cleanup. In-flight fetches and host observers are left alone.
    pub fn destroy(&mut self) -> CoreResult<()> {
        if self.state == LifecycleState::Destroyed {
            return Ok(());
        }
        if !self.state.can_transition_to(LifecycleState::Destroyed) {
            return Err(WrapperError::InvalidTransition {
                from: self.state.to_string(),
                to: LifecycleState::Destroyed.to_string(),
            });
        }

        self.negotiator.cancel_pending();
        if let Some(theme) = self.theme.as_mut() {
            theme.detach();
        }
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }

        self.state.transition(LifecycleState::Destroyed)?;
        info!("Wrapper destroyed");
        Ok(())
    }
}
