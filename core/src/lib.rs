//! rdframes-core
//!
//! Reader and writer for reaction-diffusion frame files: a 12-byte header
//! followed by pairs of `f64` grids, plus the simulator that produces them.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod logging;
pub mod types;

pub mod headers;
pub mod telemetry;

// Stream layers
pub mod stream;

// Producer
pub mod simulation;

pub use stream::{decode_all, read_frame, read_header};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{DecoderConfig, SimulationConfig, StepPolicy};
    pub use crate::headers::{Header, HeaderError};
    pub use crate::simulation::{ReactionKind, Simulation, SimulationError};
    pub use crate::stream::{
        decode_all, decode_file, open_file, DecoderState, Frame, FrameDecoder, FrameError,
        FrameWriter, Grid,
    };
    pub use crate::telemetry::{Stage, TelemetrySnapshot};
    pub use crate::types::StreamError;
}
