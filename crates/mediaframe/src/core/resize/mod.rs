//! Resize Negotiation
//!
//! Keeps the hosting frame informed of the embedded document's content height
//! through a one-way, fire-and-forget message protocol.

pub mod measure;
pub mod message;
pub mod negotiator;
pub mod triggers;

pub use measure::measure_content_height;
pub use message::{FrameMessage, InboundMessage, FRAME_RESIZE_SUBJECT};
pub use negotiator::{ResizeNegotiator, ResizeSnapshot};
pub use triggers::{ArmedTriggers, MutationKind, ReportAction, ResizeTrigger};
