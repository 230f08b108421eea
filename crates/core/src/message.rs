//! Outbound protocol messages sent to the remote client

use serde::{Deserialize, Serialize};

/// Payload of a `bot-tts-text` message
///
/// `timestamp` is deliberately not `skip_serializing_if`: whether an absent
/// value is dropped or sent as `null` is decided per send through
/// [`SendOptions::omit_absent_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsTextMessageData {
    /// Word or utterance text
    pub text: String,
    /// Absolute presentation timestamp in nanoseconds
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// Messages sent to the client, tagged as `{"type": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Text the bot is speaking, with optional word timing
    BotTtsText(TtsTextMessageData),
}

impl ServerMessage {
    /// Build a `bot-tts-text` message
    pub fn bot_tts_text(text: impl Into<String>, timestamp: Option<u64>) -> Self {
        ServerMessage::BotTtsText(TtsTextMessageData {
            text: text.into(),
            timestamp,
        })
    }

    /// Wire name of the message type
    pub fn message_type(&self) -> &'static str {
        match self {
            ServerMessage::BotTtsText(_) => "bot-tts-text",
        }
    }

    /// Serialize to a JSON value honoring the send options
    pub fn to_value(&self, options: SendOptions) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if options.omit_absent_fields {
            strip_nulls(&mut value);
        }
        Ok(value)
    }

    /// Serialize to JSON text honoring the send options
    pub fn to_json(&self, options: SendOptions) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_value(options)?)
    }
}

/// Options passed to the send primitive alongside a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendOptions {
    /// Drop absent (null) fields from the serialized form
    pub omit_absent_fields: bool,
}

impl SendOptions {
    /// Options that keep the backward-compatible wire shape
    pub fn omit_absent() -> Self {
        Self {
            omit_absent_fields: true,
        }
    }
}

fn strip_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_with_timestamp() {
        let msg = ServerMessage::bot_tts_text("hello", Some(1_234_567_890));
        let value = msg.to_value(SendOptions::omit_absent()).unwrap();
        assert_eq!(
            value,
            json!({"type": "bot-tts-text", "data": {"text": "hello", "timestamp": 1234567890}})
        );
    }

    #[test]
    fn test_absent_timestamp_omitted() {
        let msg = ServerMessage::bot_tts_text("world", None);
        let json = msg.to_json(SendOptions::omit_absent()).unwrap();
        assert!(!json.contains("timestamp"));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            json!({"type": "bot-tts-text", "data": {"text": "world"}})
        );
    }

    #[test]
    fn test_absent_timestamp_kept_as_null_without_omission() {
        let msg = ServerMessage::bot_tts_text("world", None);
        let value = msg.to_value(SendOptions::default()).unwrap();
        assert_eq!(value["data"]["timestamp"], serde_json::Value::Null);
        assert!(value["data"].as_object().unwrap().contains_key("timestamp"));
    }

    #[test]
    fn test_zero_timestamp_is_not_absent() {
        let msg = ServerMessage::bot_tts_text("zero", Some(0));
        let value = msg.to_value(SendOptions::omit_absent()).unwrap();
        assert_eq!(value["data"]["timestamp"], json!(0));
    }

    #[test]
    fn test_deserialize_without_timestamp() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"bot-tts-text","data":{"text":"hi"}}"#).unwrap();
        assert_eq!(msg, ServerMessage::bot_tts_text("hi", None));
        assert_eq!(msg.message_type(), "bot-tts-text");
    }
}
