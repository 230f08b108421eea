//! Word timestamp sync pipeline
//!
//! This crate provides:
//! - Timestamp accumulation (relative word offsets to absolute timestamps)
//! - Word event emitter driven by TTS provider signals
//! - `bot-tts-text` protocol observer
//! - In-process frame bus delivering frame-pushed events to observers

pub mod bus;
pub mod observer;
pub mod stream;
pub mod timestamps;
pub mod tts;

pub use bus::{BusStats, FrameBus};
pub use observer::{BotTtsTextObserver, ObserverStats};
pub use stream::TtsStream;
pub use timestamps::{secs_to_nanos, TimestampAccumulator, WordRecord};
pub use tts::{ProviderSignal, WordEventEmitter, WordOffset};
