//! A single TTS stream wired to the frame bus
//!
//! Owns the stream's emitter (and through it, its accumulator) and pushes
//! every emitted frame downstream on the bus.

use std::sync::Arc;
use tts_sync_core::{FrameDirection, Result};

use crate::bus::FrameBus;
use crate::tts::{ProviderSignal, WordEventEmitter};

pub struct TtsStream {
    source: String,
    emitter: WordEventEmitter,
    bus: Arc<FrameBus>,
}

impl TtsStream {
    pub fn new(source: impl Into<String>, emitter: WordEventEmitter, bus: Arc<FrameBus>) -> Self {
        Self {
            source: source.into(),
            emitter,
            bus,
        }
    }

    /// Handle a provider signal and publish the resulting frames in order
    ///
    /// Returns the number of frames published.
    pub async fn signal(&mut self, signal: ProviderSignal) -> Result<usize> {
        let frames = self.emitter.handle(signal)?;
        let count = frames.len();
        for frame in frames {
            self.bus
                .push_frame(&self.source, None, frame, FrameDirection::Downstream)
                .await?;
        }
        Ok(count)
    }

    pub fn emitter(&self) -> &WordEventEmitter {
        &self.emitter
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
