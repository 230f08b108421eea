//! Core traits for TTS word timestamp sync
//!
//! ```text
//! Pipeline:
//!   - Frame / FramePushed: data flowing across processor boundaries
//!
//! Observation:
//!   - FrameObserver: receives every frame-pushed event, read-only
//!
//! Transport:
//!   - MessageSender: delivers protocol messages to the remote client
//! ```

mod observer;
mod pipeline;
mod transport;

pub use observer::FrameObserver;
pub use pipeline::{Frame, FrameDirection, FramePushed, TtsTextFrame};
pub use transport::MessageSender;
