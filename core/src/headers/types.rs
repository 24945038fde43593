//! headers/types.rs
//! Stream header struct and its validation.
//!
//! Notes:
//! - The header is 12 bytes: `width`, `height`, `steps`, each a signed 32-bit
//!   little-endian integer. No magic, version or checksum.
//! - `steps` alone does not fix the frame count; see [`StepPolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StepPolicy;
use crate::constants::HEADER_LEN;
use crate::stream::framing::{frame_len, FrameError};

/// Fixed header size in bytes.
pub const HEADER_LEN_V1: usize = HEADER_LEN;

/// Decoded stream header.
/// - Fields keep their wire type so malformed values survive decoding and
///   can be reported verbatim by `validate()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    pub width: i32,  // grid columns
    pub height: i32, // grid rows
    pub steps: i32,  // declared step count
}

impl Header {
    pub const LEN: usize = HEADER_LEN_V1;

    pub fn new(width: i32, height: i32, steps: i32) -> Self {
        Self { width, height, steps }
    }

    /// Canonical header for tests: 2x2 grid, one step.
    /// Guaranteed to pass `validate()` unless a regression is introduced.
    pub fn test_header() -> Self {
        Self::new(2, 2, 1)
    }

    /// Reject shapes the frame reader cannot reshape into.
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(HeaderError::InvalidShape {
                width: self.width,
                height: self.height,
            });
        }
        if self.steps < 0 {
            return Err(HeaderError::NegativeSteps { steps: self.steps });
        }
        Ok(())
    }

    /// Number of cells in one grid. Zero for invalid shapes.
    pub fn cells(&self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Number of frames the stream carries under `policy`.
    pub fn frame_count(&self, policy: StepPolicy) -> u64 {
        let steps = u64::try_from(self.steps).unwrap_or(0);
        match policy {
            StepPolicy::Exclusive => steps,
            StepPolicy::Inclusive => steps + 1,
        }
    }

    /// Encoded length of one frame (both grids).
    pub fn frame_len(&self) -> Result<usize, FrameError> {
        frame_len(self.width, self.height)
    }

    /// Total stream length implied by this header under `policy`.
    pub fn expected_stream_len(&self, policy: StepPolicy) -> Result<u64, FrameError> {
        let frame = self.frame_len()? as u64;
        self.frame_count(policy)
            .checked_mul(frame)
            .and_then(|payload| payload.checked_add(Self::LEN as u64))
            .ok_or(FrameError::FrameTooLarge {
                width: self.width,
                height: self.height,
            })
    }

    pub fn summary(&self) -> String {
        format!("{}x{} grid, {} steps", self.width, self.height, self.steps)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Stream ended inside the fixed-size header.
    #[error("header truncated: {have} < {need} bytes")]
    Truncated { have: usize, need: usize },

    /// Width or height is zero or negative.
    #[error("invalid grid shape: width={width}, height={height}")]
    InvalidShape { width: i32, height: i32 },

    /// Step count is negative.
    #[error("invalid step count: {steps}")]
    NegativeSteps { steps: i32 },
}

impl HeaderError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, HeaderError::Truncated { .. })
    }

    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            HeaderError::InvalidShape { .. } | HeaderError::NegativeSteps { .. }
        )
    }
}
