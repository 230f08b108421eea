//! Utterance-relative to absolute word timestamps
//!
//! Providers report word offsets relative to the start of each utterance,
//! restarting near zero every time. The accumulator anchors each utterance
//! to a clock reading taken on `start` and adds the offsets to it.

use std::sync::Arc;

use tts_sync_config::AnchorPolicy;
use tts_sync_core::{Clock, TimestampError, NANOS_PER_SECOND};

/// One word (or punctuation token) with its absolute timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub text: String,
    /// Absolute timestamp (ns); `None` when the provider gave no timing
    pub timestamp: Option<u64>,
}

impl WordRecord {
    /// Record for a word without timing information
    pub fn untimed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
        }
    }
}

/// Converts relative word offsets into absolute timestamps
///
/// `UNSTARTED -> STARTED` on [`start`](Self::start), back on
/// [`reset`](Self::reset). [`record`](Self::record) is only valid while
/// started. One instance per TTS stream; not shared between streams.
pub struct TimestampAccumulator {
    clock: Arc<dyn Clock>,
    policy: AnchorPolicy,
    /// Clock time of offset zero for the current utterance
    anchor: Option<u64>,
    /// Largest timestamp handed out so far, across utterances
    last_timestamp: Option<u64>,
}

impl TimestampAccumulator {
    /// Create an accumulator leaving separation to the caller
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(clock, AnchorPolicy::CallerContract)
    }

    pub fn with_policy(clock: Arc<dyn Clock>, policy: AnchorPolicy) -> Self {
        Self {
            clock,
            policy,
            anchor: None,
            last_timestamp: None,
        }
    }

    /// Anchor the current utterance to the clock
    ///
    /// No-op while already started. Under [`AnchorPolicy::Enforced`] fails
    /// with `AnchorRegression` if the clock has not moved past the last
    /// recorded timestamp; the accumulator stays unstarted in that case.
    pub fn start(&mut self) -> Result<(), TimestampError> {
        if self.anchor.is_some() {
            return Ok(());
        }

        let now = self.clock.now_ns();
        if self.policy == AnchorPolicy::Enforced {
            if let Some(last) = self.last_timestamp {
                if now <= last {
                    return Err(TimestampError::AnchorRegression {
                        now_ns: now,
                        last_ns: last,
                    });
                }
            }
        }

        tracing::trace!(anchor_ns = now, "Word timestamps started");
        self.anchor = Some(now);
        Ok(())
    }

    /// Discard the anchor; safe to call when not started
    pub fn reset(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            tracing::trace!(anchor_ns = anchor, "Word timestamps reset");
        }
    }

    /// Stamp a word with `anchor + relative_offset_ns`
    ///
    /// Offsets are not reordered: a decreasing sequence from the provider
    /// yields decreasing timestamps.
    pub fn record(
        &mut self,
        word: impl Into<String>,
        relative_offset_ns: i64,
    ) -> Result<WordRecord, TimestampError> {
        let word = word.into();
        let Some(anchor) = self.anchor else {
            return Err(TimestampError::NotStarted { word });
        };

        let offset = match u64::try_from(relative_offset_ns) {
            Ok(offset) => offset,
            Err(_) => {
                return Err(TimestampError::MalformedOffset {
                    word,
                    detail: format!("negative offset {}ns", relative_offset_ns),
                })
            }
        };

        let Some(timestamp) = anchor.checked_add(offset) else {
            return Err(TimestampError::MalformedOffset {
                word,
                detail: format!("offset {}ns overflows the clock range", offset),
            });
        };

        self.last_timestamp = Some(self.last_timestamp.map_or(timestamp, |t| t.max(timestamp)));

        Ok(WordRecord {
            text: word,
            timestamp: Some(timestamp),
        })
    }

    /// Same as [`record`](Self::record) for offsets given in seconds
    pub fn record_secs(
        &mut self,
        word: impl Into<String>,
        relative_offset_secs: f64,
    ) -> Result<WordRecord, TimestampError> {
        let word = word.into();
        // Checked before rounding: tiny negatives would round to zero
        if relative_offset_secs < 0.0 {
            return Err(TimestampError::MalformedOffset {
                word,
                detail: format!("negative offset {}s", relative_offset_secs),
            });
        }
        let offset_ns = secs_to_nanos(relative_offset_secs).ok_or_else(|| {
            TimestampError::MalformedOffset {
                word: word.clone(),
                detail: format!("invalid offset {}s", relative_offset_secs),
            }
        })?;
        self.record(word, offset_ns)
    }

    pub fn is_started(&self) -> bool {
        self.anchor.is_some()
    }

    /// Anchor of the current utterance
    pub fn anchor(&self) -> Option<u64> {
        self.anchor
    }

    /// Largest timestamp recorded so far, surviving resets
    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    pub fn policy(&self) -> AnchorPolicy {
        self.policy
    }
}

/// Seconds to nanoseconds, rounded to the nearest nanosecond
///
/// `None` for non-finite input or values outside the `i64` range. Negative
/// values are passed through so `record` can report them.
pub fn secs_to_nanos(secs: f64) -> Option<i64> {
    if !secs.is_finite() {
        return None;
    }
    let nanos = (secs * NANOS_PER_SECOND as f64).round();
    if nanos < i64::MIN as f64 || nanos >= i64::MAX as f64 {
        return None;
    }
    Some(nanos as i64)
}
