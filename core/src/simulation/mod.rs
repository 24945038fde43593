//! simulation — the producer side: reaction-diffusion runs written as frame
//! streams.
//!
//! `params` parses model parameter strings, `init` lays down starting
//! patterns, `reaction` holds the kinetic models and `integrator` steps them
//! forward and feeds a [`FrameWriter`](crate::stream::FrameWriter).

pub mod init;
pub mod integrator;
pub mod params;
pub mod reaction;

use thiserror::Error;

use crate::config::ConfigError;

pub use integrator::{laplacian, simulate_to_file, Simulation};
pub use params::Parameters;
pub use reaction::{
    Barkley, Brusselator, FitzhughNagumo, GrayScott, LotkaVolterra, ReactionKind, ReactionSystem,
};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid parameters `{params}`: {reason}")]
    InvalidParameters { params: String, reason: String },

    #[error("missing parameter `{name}`")]
    MissingParameter { name: &'static str },

    #[error("unknown reaction `{0}`")]
    UnknownReaction(String),

    #[error("invalid grid {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },

    #[error("integration worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
