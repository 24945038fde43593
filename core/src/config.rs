//! Decoder and simulation configuration.
//!
//! Both structs are plain serde types with `#[serde(default)]`, so a JSON file
//! only has to name the fields it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{sim_defaults, DEFAULT_INCLUSIVE_STEP_COUNT, DIFFUSION_STABILITY_LIMIT};
use crate::simulation::ReactionKind;

/// How many frames a header's `steps` value announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepPolicy {
    /// `steps` frames, indices `0..steps`.
    Exclusive,
    /// `steps + 1` frames, indices `0..=steps` (initial state included).
    Inclusive,
}

impl StepPolicy {
    pub fn from_inclusive(inclusive: bool) -> Self {
        if inclusive {
            StepPolicy::Inclusive
        } else {
            StepPolicy::Exclusive
        }
    }

    pub fn is_inclusive(self) -> bool {
        matches!(self, StepPolicy::Inclusive)
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        Self::from_inclusive(DEFAULT_INCLUSIVE_STEP_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Read `steps + 1` frames instead of `steps`.
    pub inclusive_step_count: bool,
    /// Fail if bytes remain after the last frame.
    pub reject_trailing_bytes: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            inclusive_step_count: DEFAULT_INCLUSIVE_STEP_COUNT,
            reject_trailing_bytes: false,
        }
    }
}

impl DecoderConfig {
    pub fn with_policy(policy: StepPolicy) -> Self {
        Self {
            inclusive_step_count: policy.is_inclusive(),
            ..Self::default()
        }
    }

    pub fn step_policy(&self) -> StepPolicy {
        StepPolicy::from_inclusive(self.inclusive_step_count)
    }
}

/// Reaction-diffusion run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Diffusion coefficient of compound A
    pub da: f64,
    /// Diffusion coefficient of compound B
    pub db: f64,
    /// Size of the space interval
    pub dx: f64,
    /// Size of the time interval
    pub dt: f64,
    pub width: u32,
    pub height: u32,
    /// Number of frames written after the initial state
    pub steps: u32,
    /// Integration steps between two written frames
    pub tsteps: u32,
    pub reaction: String,
    /// `key=value;key=value` model parameters
    pub parameters: String,
    pub seed: u64,
    /// Worker threads for the update (0 = one per core)
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            da: sim_defaults::DA,
            db: sim_defaults::DB,
            dx: sim_defaults::DX,
            dt: sim_defaults::DT,
            width: sim_defaults::WIDTH,
            height: sim_defaults::HEIGHT,
            steps: sim_defaults::STEPS,
            tsteps: sim_defaults::TSTEPS,
            reaction: sim_defaults::REACTION.to_string(),
            parameters: sim_defaults::PARAMETERS.to_string(),
            seed: sim_defaults::SEED,
            threads: 0,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_numerics()?;
        self.reaction_kind()?;
        Ok(())
    }

    /// Grid, step and coefficient checks; the reaction name is not looked at.
    pub fn validate_numerics(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.width > i32::MAX as u32 {
            return Err(ConfigError::invalid("width", format!("{} out of range", self.width)));
        }
        if self.height == 0 || self.height > i32::MAX as u32 {
            return Err(ConfigError::invalid("height", format!("{} out of range", self.height)));
        }
        if self.steps > i32::MAX as u32 {
            return Err(ConfigError::invalid("steps", format!("{} out of range", self.steps)));
        }
        if self.tsteps == 0 {
            return Err(ConfigError::invalid("tsteps", "must be at least 1"));
        }
        if !(self.dx.is_finite() && self.dx > 0.0) {
            return Err(ConfigError::invalid("dx", format!("{} is not a positive number", self.dx)));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::invalid("dt", format!("{} is not a positive number", self.dt)));
        }
        for (field, d) in [("da", self.da), ("db", self.db)] {
            if !(d.is_finite() && d >= 0.0) {
                return Err(ConfigError::invalid(field, format!("{d} is not a non-negative number")));
            }
        }
        Ok(())
    }

    pub fn reaction_kind(&self) -> Result<ReactionKind, ConfigError> {
        self.reaction
            .parse()
            .map_err(|_| ConfigError::invalid("reaction", format!("unknown reaction `{}`", self.reaction)))
    }

    /// `dt * max(Da, Db) / dx^2`, the explicit scheme's stability number.
    pub fn diffusion_number(&self) -> f64 {
        self.dt * self.da.max(self.db) / (self.dx * self.dx)
    }

    pub fn is_stable(&self) -> bool {
        self.diffusion_number() <= DIFFUSION_STABILITY_LIMIT
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}
