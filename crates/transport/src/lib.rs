//! Outbound transport for protocol messages
//!
//! Provides the send primitive used by observers:
//! - `ChannelSender`: serializes messages to JSON text and queues them for
//!   the connection writer task

pub mod channel;

pub use channel::ChannelSender;

use thiserror::Error;

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Session closed")]
    SessionClosed,

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl From<TransportError> for tts_sync_core::Error {
    fn from(err: TransportError) -> Self {
        tts_sync_core::Error::SendFailure(err.to_string())
    }
}
