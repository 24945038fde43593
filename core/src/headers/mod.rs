//! headers/mod.rs
//! The fixed 12-byte stream header.
//!
//! Notes:
//! - Little-endian across all fields, matching what the simulator writes on
//!   every platform it has been run on.
//! - No magic or version: the only sanity checks available are shape and
//!   total length, both done by the decoder.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
