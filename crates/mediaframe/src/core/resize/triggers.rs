//! Resize Trigger Sources
//!
//! Maps browser-side events to one of the three report operations, and runs
//! the timer-driven sources: the width-poll fallback and bounded polling bursts.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::message::InboundMessage;
use super::negotiator::ResizeNegotiator;
use crate::core::options::PollBurst;

/// DOM mutation observed by the document-wide mutation observer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// Attribute change, with the attribute name
    Attribute(String),
    /// Subtree insertion or removal
    ChildList,
    /// Text content change
    CharacterData,
}

/// Event that may change the content height
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResizeTrigger {
    /// `window` load
    WindowLoad,
    /// `window` resize
    WindowResize,
    /// Size observer fired on the document body
    BodyResized,
    /// Width-poll fallback noticed a width change
    WidthPoll,
    /// Document-wide mutation observer record
    Mutation(MutationKind),
    /// Capturing document-wide `load` (late images, media, nested frames)
    MediaLoaded,
    /// Fullscreen entered or left
    FullscreenChange,
    /// Player control bar shown or hidden
    ControlsToggled,
    /// Transcript panel shown or hidden
    TranscriptToggled,
    /// Cross-frame message received
    Message(InboundMessage),
}

/// Which report operation a trigger maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportAction {
    Immediate,
    Debounced,
    Forced,
    Ignore,
}

impl ResizeTrigger {
    pub fn action(&self) -> ReportAction {
        match self {
            Self::WindowLoad | Self::MediaLoaded => ReportAction::Immediate,
            Self::WindowResize
            | Self::BodyResized
            | Self::WidthPoll
            | Self::TranscriptToggled => ReportAction::Debounced,
            Self::Mutation(MutationKind::Attribute(name)) => match name.as_str() {
                "style" | "class" => ReportAction::Debounced,
                _ => ReportAction::Ignore,
            },
            Self::Mutation(MutationKind::ChildList) => ReportAction::Debounced,
            Self::Mutation(MutationKind::CharacterData) => ReportAction::Ignore,
            Self::FullscreenChange | Self::ControlsToggled => ReportAction::Forced,
            Self::Message(message) if message.requests_resize() => ReportAction::Debounced,
            Self::Message(_) => ReportAction::Ignore,
        }
    }
}

/// Handles of the timer-driven sources started by [`ResizeNegotiator::arm`].
///
/// Dropping this does not stop the sources; like the browser observers they
/// outlive a destroyed wrapper. Each task stops on its own once the
/// negotiator is dropped or its iteration bound is reached.
#[derive(Debug, Default)]
pub struct ArmedTriggers {
    pub initial_burst: Option<JoinHandle<()>>,
    pub width_poll: Option<JoinHandle<()>>,
}

impl ResizeNegotiator {
    /// Routes a trigger to its report operation
    pub fn handle(self: &Arc<Self>, trigger: &ResizeTrigger) -> ReportAction {
        let action = trigger.action();
        trace!(?trigger, ?action, "Resize trigger");
        match action {
            ReportAction::Immediate => {
                self.report_if_changed();
            }
            ReportAction::Debounced => self.report_debounced(),
            ReportAction::Forced => {
                self.report_forced();
            }
            ReportAction::Ignore => {}
        }
        action
    }

    /// Sends the first report and starts the timer-driven sources
    pub fn arm(self: &Arc<Self>) -> ArmedTriggers {
        self.report_if_changed();

        let initial_burst = self.spawn_polling_burst(self.options().initial_poll, "initial");
        let width_poll = if self.host().supports_size_observer() {
            None
        } else {
            self.spawn_width_poll()
        };

        ArmedTriggers {
            initial_burst,
            width_poll,
        }
    }

    /// Starts the H5P fallback burst when the document holds H5P content
    pub fn arm_h5p_fallback(self: &Arc<Self>, force: bool) -> Option<JoinHandle<()>> {
        if !force && !self.host().contains_h5p_content() {
            return None;
        }
        self.spawn_polling_burst(self.options().h5p_poll, "h5p")
    }

    /// Checks every `burst.interval_ms`, at most `burst.max_iterations` times
    pub fn spawn_polling_burst(
        self: &Arc<Self>,
        burst: PollBurst,
        label: &'static str,
    ) -> Option<JoinHandle<()>> {
        let runtime = Handle::try_current().ok()?;
        if burst.max_iterations == 0 {
            return None;
        }

        let weak = Arc::downgrade(self);
        debug!(label, interval_ms = burst.interval_ms, iterations = burst.max_iterations, "Starting polling burst");
        Some(runtime.spawn(async move {
            for _ in 0..burst.max_iterations {
                tokio::time::sleep(burst.interval()).await;
                let Some(this) = weak.upgrade() else {
                    return;
                };
                this.report_if_changed();
            }
            debug!(label, "Polling burst finished");
        }))
    }

    /// Width poll for hosts without a size observer; runs until the negotiator is dropped
    pub fn spawn_width_poll(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let runtime = Handle::try_current().ok()?;
        let weak: Weak<Self> = Arc::downgrade(self);
        let interval = self.options().width_poll();
        let initial_width = self.host().viewport_width();

        Some(runtime.spawn(width_poll_loop(weak, interval, initial_width)))
    }
}

async fn width_poll_loop(weak: Weak<ResizeNegotiator>, interval: Duration, mut last_width: f64) {
    loop {
        tokio::time::sleep(interval).await;
        let Some(this) = weak.upgrade() else {
            return;
        };
        let width = this.host().viewport_width();
        if width != last_width {
            last_width = width;
            this.handle(&ResizeTrigger::WidthPoll);
        }
    }
}
