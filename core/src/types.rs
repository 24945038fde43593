use std::io;

use thiserror::Error;

use crate::{
    config::ConfigError,
    headers::HeaderError,
    simulation::SimulationError,
    stream::framing::FrameError,
};

/// Unified stream error covering I/O, header, frame, config and simulation.
/// - `From<T>` impls enable `?` across the layers.
/// - Truncation and shape problems keep their own variants in the layer
///   that detected them; `is_truncated` / `is_shape` look through the layers.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error other than a short read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Writer finished with a frame count the header does not announce.
    #[error("frame count mismatch: header announces {expected}, got {actual}")]
    FrameCountMismatch { expected: u64, actual: u64 },

    /// Bytes remain after the last announced frame (strict mode only).
    #[error("trailing bytes after frame {last_index}")]
    TrailingBytes { last_index: u64 },

    /// Operation not allowed in the current decoder or writer state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

impl StreamError {
    /// Stream ended before a fixed-size read completed.
    pub fn is_truncated(&self) -> bool {
        match self {
            StreamError::Header(e) => e.is_truncated(),
            StreamError::Frame(e) => e.is_truncated(),
            _ => false,
        }
    }

    /// Declared dimensions cannot describe a grid.
    pub fn is_shape(&self) -> bool {
        match self {
            StreamError::Header(e) => e.is_shape(),
            StreamError::Frame(e) => e.is_shape(),
            _ => false,
        }
    }
}
