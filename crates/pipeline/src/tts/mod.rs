//! TTS provider integration
//!
//! Word-level timing from TTS providers, turned into timestamped frames.

mod word_emitter;

pub use word_emitter::{ProviderSignal, WordEventEmitter, WordOffset};
