//! Frame observers that mirror pipeline data onto the client channel

mod bot_tts_text;

pub use bot_tts_text::{BotTtsTextObserver, ObserverStats};
