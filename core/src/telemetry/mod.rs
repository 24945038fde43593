//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots.
//!
//! Notes:
//! - Counters are plain structs owned by the decoder/writer, no atomics.
//! - Snapshots are taken once, at the end, and never mutated.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
