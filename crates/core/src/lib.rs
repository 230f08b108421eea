//! Core traits and types for TTS word timestamp sync
//!
//! This crate provides foundational types used across all other crates:
//! - Clock sources (monotonic and manually driven)
//! - Frame types and the frame-pushed event observed on the bus
//! - Outbound protocol messages (`bot-tts-text`)
//! - Observer and sender traits
//! - Error types

pub mod clock;
pub mod error;
pub mod message;
pub mod traits;

pub use clock::{Clock, ManualClock, MonotonicClock, NANOS_PER_SECOND};
pub use error::{Error, Result, TimestampError};
pub use message::{SendOptions, ServerMessage, TtsTextMessageData};

// Trait re-exports
pub use traits::{
    // Pipeline
    Frame, FrameDirection, FramePushed, TtsTextFrame,
    // Observation
    FrameObserver,
    // Transport
    MessageSender,
};
