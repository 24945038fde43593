//! src/headers/encode.rs
//!
//! Header encoding.
//!
//! Design notes:
//! - Serializes `Header` into a fixed 12-byte buffer in little-endian order.
//! - Field order must match `decode.rs` exactly.
//! - No validation here: callers that produce streams (the frame writer)
//!   validate first, tests use this to build malformed headers on purpose.

use byteorder::{ByteOrder, LittleEndian};

use crate::headers::types::{Header, HEADER_LEN_V1};

/// Serialize a `Header` into a 12-byte little-endian buffer.
#[inline]
pub fn encode_header_le(h: &Header) -> [u8; HEADER_LEN_V1] {
    let mut out = [0u8; HEADER_LEN_V1];

    LittleEndian::write_i32(&mut out[0..4], h.width); // 0..4   width
    LittleEndian::write_i32(&mut out[4..8], h.height); // 4..8   height
    LittleEndian::write_i32(&mut out[8..12], h.steps); // 8..12  steps

    out
}
