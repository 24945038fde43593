//! Wire-format and simulation constants.

/// Size of one header field (`i32`).
pub const HEADER_FIELD_LEN: usize = 4;

/// Fixed header size in bytes: width, height, steps.
pub const HEADER_LEN: usize = 3 * HEADER_FIELD_LEN;

/// Size of one grid cell on the wire (`f64`).
pub const CELL_LEN: usize = 8;

/// Number of grids stored per frame (field A, field B).
pub const FIELDS_PER_FRAME: usize = 2;

/// Initial capacity cap for payload buffers. Reads grow past this as bytes
/// actually arrive, so a lying header cannot force a huge allocation.
pub const READ_CHUNK_HINT: usize = 1024 * 1024; // 1 MiB

/// Files carry the initial state plus one frame per step.
pub const DEFAULT_INCLUSIVE_STEP_COUNT: bool = true;

/// Defaults mirrored from the producer's command line.
pub mod sim_defaults {
    pub const DA: f64 = 1.0;
    pub const DB: f64 = 100.0;
    pub const DX: f64 = 1.0;
    pub const DT: f64 = 0.001;
    pub const WIDTH: u32 = 100;
    pub const HEIGHT: u32 = 100;
    pub const STEPS: u32 = 150;
    pub const TSTEPS: u32 = 100;
    pub const SEED: u64 = 5489;
    pub const REACTION: &str = "lotka-volterra";
    pub const PARAMETERS: &str = "alpha=1;beta=2;gamma=3;delta=4";
}

/// Forward Euler with the 5-point stencil is stable for `D dt / dx^2 <= 1/4`.
pub const DIFFUSION_STABILITY_LIMIT: f64 = 0.25;
