//! Replays recorded TTS word boundaries through the sync pipeline
//!
//! Each sentence's word offsets restart near zero, as providers report
//! them. The clock is advanced by each sentence's playback length before
//! the next one starts, and every `bot-tts-text` message is printed as the
//! client would receive it. Frames reach the observer through a spawned bus
//! task, as they would from a live provider callback.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tts_sync_config::{load_settings, Settings};
use tts_sync_core::{Clock, Frame, FrameDirection, FramePushed, ManualClock, NANOS_PER_SECOND};
use tts_sync_pipeline::{
    BotTtsTextObserver, FrameBus, ProviderSignal, TimestampAccumulator, WordEventEmitter,
    WordOffset,
};
use tts_sync_transport::ChannelSender;

/// Source name on every replayed frame
const SOURCE: &str = "tts";

/// (word, offset in seconds) per sentence, plus its playback length
const SENTENCES: &[(&[(&str, f64)], f64)] = &[
    (
        &[
            ("Bonjour", 0.08),
            (",", 0.77),
            ("merci", 1.01),
            ("d'être", 1.30),
            ("là", 1.58),
            (".", 1.87),
        ],
        2.0,
    ),
    (
        &[
            ("Nous", 0.10),
            ("allons", 0.20),
            ("faire", 0.43),
            ("un", 0.62),
            ("petit", 0.68),
            ("échange", 0.90),
        ],
        3.0,
    ),
    (&[("Avant", 0.10), ("de", 0.30), ("commencer", 0.39)], 1.0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("TTS_SYNC_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::info!(
        anchor_policy = ?settings.timestamps.anchor_policy,
        bot_tts_enabled = settings.observer.bot_tts_enabled,
        "Starting replay"
    );

    let clock = Arc::new(ManualClock::new(NANOS_PER_SECOND));
    let (sender, mut outbound) =
        ChannelSender::channel("replay", settings.transport.outbound_capacity);

    let writer = tokio::spawn(async move {
        let mut timestamps = Vec::new();
        while let Some(text) = outbound.recv().await {
            println!("{}", text);
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(ts) = value["data"]["timestamp"].as_u64() {
                    timestamps.push(ts);
                }
            }
        }
        timestamps
    });

    let observer = Arc::new(BotTtsTextObserver::new(
        settings.observer.clone(),
        Arc::new(sender),
    ));
    let mut bus = FrameBus::new(clock.clone());
    bus.register(observer.clone());
    let (events, bus_task) = bus.spawn(settings.bus.channel_capacity);

    let accumulator =
        TimestampAccumulator::with_policy(clock.clone(), settings.timestamps.anchor_policy);
    let mut emitter = WordEventEmitter::new(accumulator);

    for (words, playback_secs) in SENTENCES {
        let frames = emitter
            .handle(ProviderSignal::UtteranceBegin)
            .context("utterance begin")?;
        forward(&events, &*clock, frames).await?;
        for (word, offset) in *words {
            let frames = emitter
                .handle(ProviderSignal::word(*word, WordOffset::Seconds(*offset)))
                .with_context(|| format!("word '{}'", word))?;
            forward(&events, &*clock, frames).await?;
        }
        clock.advance_secs(*playback_secs);
        let frames = emitter
            .handle(ProviderSignal::UtteranceEnd)
            .context("utterance end")?;
        forward(&events, &*clock, frames).await?;
    }

    forward(&events, &*clock, vec![Frame::EndOfStream]).await?;
    drop(events);
    let bus_stats = bus_task.await.context("bus task")?;

    let stats = observer.stats();
    // The bus task owned the other observer handle; this closes the writer
    drop(observer);
    let timestamps = writer.await.context("writer task")?;

    let monotonic = timestamps.windows(2).all(|w| w[0] < w[1]);
    tracing::info!(
        events = bus_stats.events_delivered,
        observer_failures = bus_stats.observer_failures,
        messages = stats.messages_sent,
        timestamps = timestamps.len(),
        monotonic,
        "Replay finished"
    );
    if bus_stats.observer_failures > 0 {
        anyhow::bail!("{} events failed delivery", bus_stats.observer_failures);
    }
    if !monotonic {
        anyhow::bail!("timestamps regressed across sentences");
    }

    Ok(())
}

/// Queue emitted frames for the bus task, stamped with the current clock
async fn forward(
    events: &mpsc::Sender<FramePushed>,
    clock: &dyn Clock,
    frames: Vec<Frame>,
) -> anyhow::Result<()> {
    for frame in frames {
        let event = FramePushed::new(SOURCE, frame, FrameDirection::Downstream).at(clock.now_ns());
        events.send(event).await.context("bus task stopped")?;
    }
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.observability.log_level));

    let fmt_layer = if settings.observability.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}
