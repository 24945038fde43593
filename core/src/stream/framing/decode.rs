use byteorder::{ByteOrder, LittleEndian};

use crate::stream::framing::types::{field_len, Frame, FrameError};
use crate::stream::grid::Grid;

/// Decode a single frame from bytes.
///
/// Caller guarantees:
/// - `wire` holds exactly one frame for a `width x height` grid
/// - Ordering (and therefore `index`) is handled externally
///
/// A short buffer is reported as `Truncated`, a long one as `LengthMismatch`.
pub fn decode_frame(index: u64, wire: &[u8], width: i32, height: i32) -> Result<Frame, FrameError> {
    let field_bytes = field_len(width, height)?;
    let need = 2 * field_bytes;

    if wire.len() < need {
        return Err(FrameError::Truncated {
            index,
            have: wire.len(),
            need,
        });
    }
    if wire.len() != need {
        return Err(FrameError::LengthMismatch {
            expected: need,
            actual: wire.len(),
        });
    }

    let rows = height as usize;
    let cols = width as usize;

    let field_a = decode_field(&wire[..field_bytes], rows, cols)?;
    let field_b = decode_field(&wire[field_bytes..], rows, cols)?;

    Ok(Frame { index, field_a, field_b })
}

#[inline]
fn decode_field(bytes: &[u8], rows: usize, cols: usize) -> Result<Grid, FrameError> {
    let mut cells = vec![0f64; rows * cols];
    LittleEndian::read_f64_into(bytes, &mut cells);
    Grid::from_vec(rows, cols, cells)
}
