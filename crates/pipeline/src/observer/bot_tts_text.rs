//! Forwards timestamped TTS text to the client as `bot-tts-text` messages
//!
//! Every matching event is sent synchronously in observation order; there
//! is no buffering, coalescing, or retrying.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tts_sync_config::ObserverConfig;
use tts_sync_core::{
    FrameObserver, FramePushed, MessageSender, Result, SendOptions, ServerMessage,
    TtsTextMessageData,
};

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverStats {
    pub messages_sent: u64,
    pub send_failures: u64,
    pub frames_ignored: u64,
}

/// Observer mapping `TtsText` frames to `bot-tts-text` messages
pub struct BotTtsTextObserver {
    config: ObserverConfig,
    sender: Arc<dyn MessageSender>,
    stats: Mutex<ObserverStats>,
}

impl BotTtsTextObserver {
    pub fn new(config: ObserverConfig, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            config,
            sender,
            stats: Mutex::new(ObserverStats::default()),
        }
    }

    /// Build the message for an event, or `None` if it is not forwarded
    fn message_for(&self, event: &FramePushed) -> Option<ServerMessage> {
        if !self.config.bot_tts_enabled {
            return None;
        }
        let frame = event.frame.as_tts_text()?;
        Some(ServerMessage::BotTtsText(TtsTextMessageData {
            text: frame.text.clone(),
            timestamp: frame.pts,
        }))
    }

    pub fn is_enabled(&self) -> bool {
        self.config.bot_tts_enabled
    }

    pub fn stats(&self) -> ObserverStats {
        *self.stats.lock()
    }
}

#[async_trait]
impl FrameObserver for BotTtsTextObserver {
    async fn on_push_frame(&self, event: &FramePushed) -> Result<()> {
        let Some(message) = self.message_for(event) else {
            self.stats.lock().frames_ignored += 1;
            return Ok(());
        };

        match self.sender.send(&message, SendOptions::omit_absent()).await {
            Ok(()) => {
                self.stats.lock().messages_sent += 1;
                tracing::debug!(
                    source = %event.source,
                    direction = ?event.direction,
                    message = message.message_type(),
                    "Forwarded TTS text"
                );
                Ok(())
            }
            Err(e) => {
                self.stats.lock().send_failures += 1;
                tracing::warn!(
                    source = %event.source,
                    error = %e,
                    "Failed to send TTS text message"
                );
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "bot_tts_text_observer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tts_sync_core::{Error, Frame, FrameDirection, TtsTextFrame};

    /// Captures serialized messages instead of sending them
    #[derive(Default)]
    struct CapturingSender {
        sent: Mutex<Vec<Value>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageSender for CapturingSender {
        async fn send(&self, message: &ServerMessage, options: SendOptions) -> Result<()> {
            if self.fail {
                return Err(Error::SendFailure("connection reset".into()));
            }
            self.sent.lock().push(message.to_value(options)?);
            Ok(())
        }
    }

    fn observer(enabled: bool) -> (Arc<CapturingSender>, BotTtsTextObserver) {
        let sender = Arc::new(CapturingSender::default());
        let observer = BotTtsTextObserver::new(
            ObserverConfig {
                bot_tts_enabled: enabled,
            },
            sender.clone(),
        );
        (sender, observer)
    }

    fn tts_event(text: &str, pts: Option<u64>) -> FramePushed {
        let frame = TtsTextFrame {
            text: text.into(),
            pts,
        };
        FramePushed::new("output_transport", Frame::TtsText(frame), FrameDirection::Upstream)
    }

    #[tokio::test]
    async fn test_forwards_timestamp() {
        let (sender, observer) = observer(true);
        observer
            .on_push_frame(&tts_event("hello", Some(1_234_567_890)))
            .await
            .unwrap();

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            json!({"type": "bot-tts-text", "data": {"text": "hello", "timestamp": 1234567890}})
        );
    }

    #[tokio::test]
    async fn test_absent_timestamp_has_no_key() {
        let (sender, observer) = observer(true);
        observer
            .on_push_frame(&tts_event("world", None))
            .await
            .unwrap();

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            json!({"type": "bot-tts-text", "data": {"text": "world"}})
        );
    }

    #[tokio::test]
    async fn test_disabled_sends_nothing() {
        let (sender, observer) = observer(false);
        observer
            .on_push_frame(&tts_event("test", Some(9_876_543_210)))
            .await
            .unwrap();
        assert!(sender.sent.lock().is_empty());
        assert_eq!(observer.stats().frames_ignored, 1);
    }

    #[tokio::test]
    async fn test_non_matching_frames_ignored() {
        let (sender, observer) = observer(true);
        let events = [
            FramePushed::new("tts", Frame::TtsStarted, FrameDirection::Downstream),
            FramePushed::new("llm", Frame::Text("hi".into()), FrameDirection::Downstream),
            FramePushed::new("input", Frame::Interruption, FrameDirection::Upstream),
            FramePushed::new("tts", Frame::EndOfStream, FrameDirection::Downstream),
        ];
        for event in &events {
            observer.on_push_frame(event).await.unwrap();
        }
        assert!(sender.sent.lock().is_empty());
        assert_eq!(observer.stats().frames_ignored, 4);
    }

    #[tokio::test]
    async fn test_order_preserved_for_matching_events() {
        let (sender, observer) = observer(true);
        let events = vec![
            tts_event("one", Some(1)),
            FramePushed::new("tts", Frame::TtsStarted, FrameDirection::Downstream),
            tts_event("two", None),
            FramePushed::new("llm", Frame::Text("skip".into()), FrameDirection::Downstream),
            tts_event("three", Some(3)),
        ];
        for event in &events {
            observer.on_push_frame(event).await.unwrap();
        }

        let texts: Vec<String> = sender
            .sent
            .lock()
            .iter()
            .map(|v| v["data"]["text"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(
            observer.stats(),
            ObserverStats {
                messages_sent: 3,
                send_failures: 0,
                frames_ignored: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_send_failure_propagates() {
        let sender = Arc::new(CapturingSender {
            fail: true,
            ..Default::default()
        });
        let observer = BotTtsTextObserver::new(ObserverConfig::default(), sender);

        let err = observer
            .on_push_frame(&tts_event("lost", Some(1)))
            .await
            .unwrap_err();
        assert!(err.is_send_failure());
        assert_eq!(observer.stats().send_failures, 1);
        assert_eq!(observer.stats().messages_sent, 0);
    }
}
