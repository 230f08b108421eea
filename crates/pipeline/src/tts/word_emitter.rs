//! Word event emitter
//!
//! Bridges a provider's word timing callbacks into timestamped text frames.
//! The provider drives it with three kinds of signal:
//! - `UtteranceBegin`: anchor timestamps (`start`)
//! - `Word`: stamp the word and emit a `TtsText` frame
//! - `UtteranceEnd` / `Interrupt`: drop the anchor (`reset`)

use tts_sync_core::{Frame, Result, TtsTextFrame};

use crate::timestamps::{TimestampAccumulator, WordRecord};

/// Relative onset of a word within its utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WordOffset {
    Nanos(i64),
    /// Some providers (e.g. Azure word boundaries) report seconds
    Seconds(f64),
}

/// Signals sent by a TTS provider integration
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSignal {
    UtteranceBegin,
    Word {
        text: String,
        /// `None` when the provider has no timing for this word
        offset: Option<WordOffset>,
    },
    UtteranceEnd,
    Interrupt,
}

impl ProviderSignal {
    pub fn word(text: impl Into<String>, offset: WordOffset) -> Self {
        ProviderSignal::Word {
            text: text.into(),
            offset: Some(offset),
        }
    }

    pub fn untimed_word(text: impl Into<String>) -> Self {
        ProviderSignal::Word {
            text: text.into(),
            offset: None,
        }
    }
}

/// Turns provider signals into frames, owning the stream's accumulator
pub struct WordEventEmitter {
    accumulator: TimestampAccumulator,
    /// Utterances begun so far
    utterances: u64,
    /// Words emitted in the current utterance
    words_in_utterance: usize,
    in_utterance: bool,
}

impl WordEventEmitter {
    pub fn new(accumulator: TimestampAccumulator) -> Self {
        Self {
            accumulator,
            utterances: 0,
            words_in_utterance: 0,
            in_utterance: false,
        }
    }

    /// Handle one provider signal, returning the frames to push
    ///
    /// A failing word produces no frame and leaves the anchor intact; the
    /// next word is processed normally.
    pub fn handle(&mut self, signal: ProviderSignal) -> Result<Vec<Frame>> {
        match signal {
            ProviderSignal::UtteranceBegin => {
                self.begin_utterance()?;
                Ok(vec![Frame::TtsStarted])
            }
            ProviderSignal::Word { text, offset } => {
                let record = self.stamp_word(text, offset)?;
                // Untimed words may arrive outside any utterance
                if self.in_utterance {
                    self.words_in_utterance += 1;
                }
                let frame = TtsTextFrame {
                    text: record.text,
                    pts: record.timestamp,
                };
                Ok(vec![Frame::TtsText(frame)])
            }
            ProviderSignal::UtteranceEnd => {
                self.end_utterance("end");
                Ok(vec![Frame::TtsStopped])
            }
            ProviderSignal::Interrupt => {
                self.end_utterance("interrupt");
                Ok(vec![Frame::Interruption])
            }
        }
    }

    fn begin_utterance(&mut self) -> Result<()> {
        // Already anchored: repeated begin signals are harmless
        self.accumulator.start()?;
        if !self.in_utterance {
            self.in_utterance = true;
            self.utterances += 1;
            self.words_in_utterance = 0;
            tracing::debug!(
                utterance = self.utterances,
                anchor_ns = self.accumulator.anchor(),
                "Utterance started"
            );
        }
        Ok(())
    }

    fn stamp_word(&mut self, text: String, offset: Option<WordOffset>) -> Result<WordRecord> {
        let record = match offset {
            None => WordRecord::untimed(text),
            Some(WordOffset::Nanos(ns)) => self.accumulator.record(text, ns)?,
            Some(WordOffset::Seconds(secs)) => self.accumulator.record_secs(text, secs)?,
        };
        tracing::trace!(word = %record.text, timestamp_ns = record.timestamp, "Word stamped");
        Ok(record)
    }

    fn end_utterance(&mut self, reason: &'static str) {
        self.accumulator.reset();
        if self.in_utterance {
            tracing::debug!(
                utterance = self.utterances,
                words = self.words_in_utterance,
                reason,
                "Utterance finished"
            );
        }
        self.in_utterance = false;
        self.words_in_utterance = 0;
    }

    /// Whether an utterance is in progress
    pub fn in_utterance(&self) -> bool {
        self.in_utterance
    }

    pub fn utterances(&self) -> u64 {
        self.utterances
    }

    pub fn words_in_utterance(&self) -> usize {
        self.words_in_utterance
    }

    pub fn accumulator(&self) -> &TimestampAccumulator {
        &self.accumulator
    }
}
