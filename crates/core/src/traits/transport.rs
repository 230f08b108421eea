//! Outbound message transport trait

use async_trait::async_trait;

use crate::{Result, SendOptions, ServerMessage};

/// Send primitive for protocol messages
///
/// Returns once delivery completed or failed. Failures are reported as
/// [`crate::Error::SendFailure`]; retry policy belongs to the implementation.
#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    async fn send(&self, message: &ServerMessage, options: SendOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSender {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send(&self, message: &ServerMessage, options: SendOptions) -> Result<()> {
            let json = message.to_json(options)?;
            self.sent.lock().unwrap().push(json);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sender_object_safe() {
        let sender = RecordingSender {
            sent: Mutex::new(Vec::new()),
        };
        let dyn_sender: &dyn MessageSender = &sender;
        dyn_sender
            .send(&ServerMessage::bot_tts_text("hi", None), SendOptions::omit_absent())
            .await
            .unwrap();
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }
}
