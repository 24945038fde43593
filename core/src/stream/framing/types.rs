use thiserror::Error;

use crate::constants::{CELL_LEN, FIELDS_PER_FRAME};
use crate::stream::grid::Grid;

/// One decoded time step: two grids of identical shape `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the stream, starting at 0.
    pub index: u64,
    /// Concentration of compound A.
    pub field_a: Grid,
    /// Concentration of compound B.
    pub field_b: Grid,
}

impl Frame {
    pub fn new(index: u64, field_a: Grid, field_b: Grid) -> Result<Self, FrameError> {
        if field_a.shape() != field_b.shape() {
            return Err(FrameError::ShapeMismatch {
                expected: field_a.shape(),
                actual: field_b.shape(),
            });
        }
        Ok(Self { index, field_a, field_b })
    }

    /// Canonical frame for tests: both fields filled with constants.
    pub fn test_frame(index: u64, height: usize, width: usize, a: f64, b: f64) -> Self {
        Self {
            index,
            field_a: Grid::filled(height, width, a),
            field_b: Grid::filled(height, width, b),
        }
    }

    /// `(height, width)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.field_a.shape()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.field_a.cols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.field_a.rows()
    }

    pub fn into_fields(self) -> (Grid, Grid) {
        (self.field_a, self.field_b)
    }
}

/// Byte length of one field for a `width x height` grid.
pub fn field_len(width: i32, height: i32) -> Result<usize, FrameError> {
    if width <= 0 || height <= 0 {
        return Err(FrameError::InvalidShape { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|cells| cells.checked_mul(CELL_LEN))
        .ok_or(FrameError::FrameTooLarge { width, height })
}

/// Byte length of one frame (both fields).
pub fn frame_len(width: i32, height: i32) -> Result<usize, FrameError> {
    field_len(width, height)?
        .checked_mul(FIELDS_PER_FRAME)
        .ok_or(FrameError::FrameTooLarge { width, height })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Stream ended before the frame was complete.
    #[error("frame {index} truncated: {have} < {need} bytes")]
    Truncated { index: u64, have: usize, need: usize },

    /// Width or height is zero or negative.
    #[error("invalid grid shape: width={width}, height={height}")]
    InvalidShape { width: i32, height: i32 },

    /// Frame byte size does not fit in memory arithmetic.
    #[error("frame too large: width={width}, height={height}")]
    FrameTooLarge { width: i32, height: i32 },

    /// Two grids that must agree in shape do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A buffer has the wrong number of bytes or cells.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl FrameError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, FrameError::Truncated { .. })
    }

    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            FrameError::InvalidShape { .. }
                | FrameError::FrameTooLarge { .. }
                | FrameError::ShapeMismatch { .. }
        )
    }
}
