//! Channel-backed message sender
//!
//! Stands in front of a websocket/data-channel writer: each message is
//! serialized to a JSON text frame and queued. `send` completes once the
//! frame is accepted by the queue, waiting while the queue is full.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tts_sync_core::{MessageSender, Result, SendOptions, ServerMessage};

use crate::TransportError;

/// Sends JSON text frames into an mpsc queue
#[derive(Debug, Clone)]
pub struct ChannelSender {
    session_id: String,
    tx: mpsc::Sender<String>,
}

impl ChannelSender {
    pub fn new(session_id: impl Into<String>, tx: mpsc::Sender<String>) -> Self {
        Self {
            session_id: session_id.into(),
            tx,
        }
    }

    /// Create a sender together with the receiving end of its queue
    pub fn channel(
        session_id: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(session_id, tx), rx)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send_text(&self, text: String) -> std::result::Result<(), TransportError> {
        self.tx
            .send(text)
            .await
            .map_err(|_| TransportError::SessionClosed)
    }
}

#[async_trait]
impl MessageSender for ChannelSender {
    async fn send(&self, message: &ServerMessage, options: SendOptions) -> Result<()> {
        let text = message
            .to_json(options)
            .map_err(|e| TransportError::Encoding(e.to_string()))?;

        tracing::trace!(
            session_id = %self.session_id,
            message = message.message_type(),
            bytes = text.len(),
            "Queueing message"
        );

        self.send_text(text).await?;
        Ok(())
    }
}
