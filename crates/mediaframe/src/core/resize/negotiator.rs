//! Resize Negotiator
//!
//! Owns the resize state (last reported height/width, the single pending
//! debounce timer) and the three report operations:
//! - [`ResizeNegotiator::report_if_changed`]: threshold-gated send
//! - [`ResizeNegotiator::report_debounced`]: coalesces bursts into one check
//! - [`ResizeNegotiator::report_forced`]: reflow, then always send

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::measure::measure_content_height;
use super::message::FrameMessage;
use crate::core::host::FrameHost;
use crate::core::options::ResizeOptions;

/// Mutable resize state; touched only by the negotiator
#[derive(Debug, Default)]
struct ResizeState {
    last_height: f64,
    last_width: f64,
    /// At most one outstanding debounce timer
    pending: Option<JoinHandle<()>>,
    /// Bumped on every debounce request; a timer only fires for its own generation
    generation: u64,
    sent: u64,
}

/// Read-only copy of the negotiator's state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeSnapshot {
    pub last_height: f64,
    pub last_width: f64,
    pub has_pending: bool,
    pub sent: u64,
}

/// Cross-frame height reporter for one embedded document
pub struct ResizeNegotiator {
    host: Arc<dyn FrameHost>,
    options: ResizeOptions,
    state: Mutex<ResizeState>,
}

impl std::fmt::Debug for ResizeNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeNegotiator")
            .field("options", &self.options)
            .field("state", &self.snapshot())
            .finish()
    }
}

impl ResizeNegotiator {
    pub fn new(host: Arc<dyn FrameHost>, options: ResizeOptions) -> Arc<Self> {
        Arc::new(Self {
            host,
            options,
            state: Mutex::new(ResizeState::default()),
        })
    }

    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    pub(crate) fn host(&self) -> &Arc<dyn FrameHost> {
        &self.host
    }

    fn state(&self) -> MutexGuard<'_, ResizeState> {
        // Handlers run to completion, so a poisoned lock still holds consistent state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ResizeSnapshot {
        let state = self.state();
        ResizeSnapshot {
            last_height: state.last_height,
            last_width: state.last_width,
            has_pending: state.pending.is_some(),
            sent: state.sent,
        }
    }

    /// Sends only if height moved by more than the threshold or width changed at all.
    ///
    /// Returns whether a message was sent.
    pub fn report_if_changed(&self) -> bool {
        if !self.host.is_embedded() {
            return false;
        }

        let metrics = self.host.measure();
        let height = measure_content_height(&metrics, self.options.fallback_height);
        let width = metrics.viewport_width;

        let mut state = self.state();
        let height_changed = (height - state.last_height).abs() > self.options.height_threshold;
        let width_changed = width != state.last_width;
        if !height_changed && !width_changed {
            trace!(height, width, "Resize check: no significant change");
            return false;
        }

        self.send(&mut state, height, width);
        true
    }

    /// Schedules one [`Self::report_if_changed`] after the quiet period.
    ///
    /// A new request cancels and restarts the pending timer; requests never queue.
    /// Without a tokio runtime the check runs immediately.
    pub fn report_debounced(self: &Arc<Self>) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime for debounce timer; reporting immediately");
            self.report_if_changed();
            return;
        };

        let mut state = self.state();
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let weak: Weak<Self> = Arc::downgrade(self);
        let delay = self.options.debounce();
        state.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(this) = weak.upgrade() else {
                return;
            };
            {
                let mut state = this.state();
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }
            this.report_if_changed();
        }));
    }

    /// Forces a reflow and sends regardless of the threshold.
    ///
    /// Returns whether a message was sent (false only when not embedded).
    pub fn report_forced(&self) -> bool {
        if !self.host.is_embedded() {
            return false;
        }

        self.host.force_reflow();
        let metrics = self.host.measure();
        let height = measure_content_height(&metrics, self.options.fallback_height);

        let mut state = self.state();
        self.send(&mut state, height, metrics.viewport_width);
        true
    }

    /// Clears the pending debounce timer, if any
    pub fn cancel_pending(&self) {
        let mut state = self.state();
        if let Some(pending) = state.pending.take() {
            pending.abort();
            debug!("Cancelled pending resize report");
        }
        state.generation = state.generation.wrapping_add(1);
    }

    fn send(&self, state: &mut ResizeState, height: f64, width: f64) {
        let message = FrameMessage::resize(height);
        debug!(height = message.height, width, "Posting frame resize");
        self.host.post_to_parent(&message);
        state.last_height = height;
        state.last_width = width;
        state.sent += 1;
    }
}
