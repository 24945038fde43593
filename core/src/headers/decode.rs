//! src/headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Deserializes the fixed 12-byte prefix into a `Header`.
//! - Only length is checked. Shape checks live in `Header::validate` so the
//!   decoder decides when they run.

use byteorder::{ByteOrder, LittleEndian};

use crate::headers::types::{Header, HeaderError};

/// Deserialize a 12-byte little-endian header.
///
/// # Returns
/// - `Ok(Header)` when at least 12 bytes are present (extra bytes ignored).
/// - `Err(HeaderError::Truncated)` otherwise.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<Header, HeaderError> {
    if buf.len() < Header::LEN {
        return Err(HeaderError::Truncated {
            have: buf.len(),
            need: Header::LEN,
        });
    }

    Ok(Header {
        width: LittleEndian::read_i32(&buf[0..4]),   // 0..4   width
        height: LittleEndian::read_i32(&buf[4..8]),  // 4..8   height
        steps: LittleEndian::read_i32(&buf[8..12]), // 8..12  steps
    })
}
