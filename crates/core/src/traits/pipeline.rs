//! Frame types that flow through the pipeline

use serde::{Deserialize, Serialize};

/// Text the bot is speaking, optionally stamped with a presentation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsTextFrame {
    /// Word, punctuation token, or whole utterance text
    pub text: String,
    /// Absolute presentation timestamp (ns); `None` when the provider has
    /// no word timing
    pub pts: Option<u64>,
}

impl TtsTextFrame {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pts: None,
        }
    }

    pub fn with_pts(mut self, pts: u64) -> Self {
        self.pts = Some(pts);
        self
    }
}

/// Frame types that flow through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// TTS synthesis of an utterance started
    TtsStarted,

    /// Spoken text with optional timing
    TtsText(TtsTextFrame),

    /// TTS synthesis of an utterance finished
    TtsStopped,

    /// User interrupted the bot
    Interruption,

    /// Plain text not tied to speech (LLM output, transcripts)
    Text(String),

    /// End of stream marker
    EndOfStream,
}

impl Frame {
    /// Check if this is an end-of-stream frame
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Frame::EndOfStream)
    }

    /// Borrow the timestamped text payload, if any
    pub fn as_tts_text(&self) -> Option<&TtsTextFrame> {
        match self {
            Frame::TtsText(text) => Some(text),
            _ => None,
        }
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Frame::TtsStarted => "tts_started",
            Frame::TtsText(_) => "tts_text",
            Frame::TtsStopped => "tts_stopped",
            Frame::Interruption => "interruption",
            Frame::Text(_) => "text",
            Frame::EndOfStream => "end_of_stream",
        }
    }
}

/// Direction a frame travels through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameDirection {
    /// Toward the input side
    Upstream,
    /// Toward the output side
    Downstream,
}

/// A frame crossing a processor boundary, as reported to observers
///
/// `direction` and `destination` are informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePushed {
    /// Processor that pushed the frame
    pub source: String,
    /// Receiving processor, if any
    pub destination: Option<String>,
    pub frame: Frame,
    pub direction: FrameDirection,
    /// Logical send time (ns)
    pub timestamp: u64,
}

impl FramePushed {
    pub fn new(source: impl Into<String>, frame: Frame, direction: FrameDirection) -> Self {
        Self {
            source: source.into(),
            destination: None,
            frame,
            direction,
            timestamp: 0,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
