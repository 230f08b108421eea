//! In-process frame bus
//!
//! Delivers frame-pushed events to registered observers, one event at a
//! time and in push order. Each observer is awaited before the next one
//! (and the next event) is considered.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tts_sync_core::{Clock, Frame, FrameDirection, FrameObserver, FramePushed, Result};

/// Channel capacity used when none is configured
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Totals reported when a spawned bus shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    pub events_delivered: u64,
    pub observer_failures: u64,
}

/// Fan-out of frame-pushed events to observers
pub struct FrameBus {
    clock: Arc<dyn Clock>,
    observers: Vec<Arc<dyn FrameObserver>>,
}

impl FrameBus {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            observers: Vec::new(),
        }
    }

    /// Register an observer; delivery follows registration order
    pub fn register(&mut self, observer: Arc<dyn FrameObserver>) -> &mut Self {
        tracing::debug!(observer = observer.name(), "Observer registered");
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Wrap a frame in an event stamped with the current clock and publish it
    pub async fn push_frame(
        &self,
        source: &str,
        destination: Option<&str>,
        frame: Frame,
        direction: FrameDirection,
    ) -> Result<()> {
        let event = FramePushed {
            source: source.to_string(),
            destination: destination.map(str::to_string),
            frame,
            direction,
            timestamp: self.clock.now_ns(),
        };
        self.publish(&event).await
    }

    /// Deliver one event to every observer
    ///
    /// A failing observer does not stop delivery to the others; the first
    /// failure is returned after all observers ran.
    pub async fn publish(&self, event: &FramePushed) -> Result<()> {
        let mut first_error = None;

        for observer in &self.observers {
            if let Err(e) = observer.on_push_frame(event).await {
                tracing::warn!(
                    observer = observer.name(),
                    frame = event.frame.name(),
                    error = %e,
                    "Observer failed"
                );
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run the bus as a task fed by a channel
    ///
    /// Events are delivered strictly in receive order and delivery continues
    /// after failures. The task ends when every sender is dropped or after an
    /// `EndOfStream` frame.
    pub fn spawn(self, capacity: usize) -> (mpsc::Sender<FramePushed>, JoinHandle<BusStats>) {
        let capacity = if capacity == 0 {
            DEFAULT_CHANNEL_CAPACITY
        } else {
            capacity
        };
        let (tx, mut rx) = mpsc::channel::<FramePushed>(capacity);

        let handle = tokio::spawn(async move {
            let mut stats = BusStats::default();

            while let Some(event) = rx.recv().await {
                let is_eos = event.frame.is_end_of_stream();

                if self.publish(&event).await.is_err() {
                    stats.observer_failures += 1;
                }
                stats.events_delivered += 1;

                if is_eos {
                    break;
                }
            }

            tracing::debug!(
                events = stats.events_delivered,
                failures = stats.observer_failures,
                "Frame bus exiting"
            );
            stats
        });

        (tx, handle)
    }
}
