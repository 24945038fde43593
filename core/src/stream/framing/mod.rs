//! Wire framing for grid frames.
//!
//! Responsibilities:
//! - Define the frame type and its byte sizes
//! - Encode a field pair into the canonical byte layout
//! - Decode a field pair with strict length checks
//!
//! Non-responsibilities:
//! - IO
//! - Frame counting and ordering

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{field_len, frame_len, Frame, FrameError};
pub use encode::{encode_frame, encode_frame_into};
pub use decode::decode_frame;
