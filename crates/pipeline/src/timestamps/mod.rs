//! Word timestamp accumulation

mod accumulator;

pub use accumulator::{secs_to_nanos, TimestampAccumulator, WordRecord};
