use byteorder::{ByteOrder, LittleEndian};

use crate::constants::CELL_LEN;
use crate::stream::framing::types::{Frame, FrameError};
use crate::stream::grid::Grid;

/// Encode a frame into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ field_a (w*h f64 LE, row-major) ]
/// [ field_b (w*h f64 LE, row-major) ]
/// ```
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::new();
    encode_frame_into(&frame.field_a, &frame.field_b, &mut out)?;
    Ok(out)
}

/// Append the encoded field pair to `out`.
///
/// `out` is left untouched on error.
pub fn encode_frame_into(field_a: &Grid, field_b: &Grid, out: &mut Vec<u8>) -> Result<(), FrameError> {
    if field_a.shape() != field_b.shape() {
        return Err(FrameError::ShapeMismatch {
            expected: field_a.shape(),
            actual: field_b.shape(),
        });
    }

    let field_bytes = field_a.len() * CELL_LEN;
    let start = out.len();
    out.resize(start + 2 * field_bytes, 0);

    // --- Body ---
    let (a_dst, b_dst) = out[start..].split_at_mut(field_bytes);
    LittleEndian::write_f64_into(field_a.as_slice(), a_dst);
    LittleEndian::write_f64_into(field_b.as_slice(), b_dst);

    Ok(())
}
