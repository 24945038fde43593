//! Reaction terms and their initial conditions.
//!
//! Each model gives the local rates `(ra, rb)` for concentrations `(a, b)`;
//! diffusion is added by the integrator.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use tracing::info;

use crate::simulation::init::{half_screen, random_around, random_rectangles};
use crate::simulation::params::Parameters;
use crate::simulation::SimulationError;
use crate::stream::grid::Grid;

pub trait ReactionSystem: Send + Sync {
    fn name(&self) -> &'static str;

    /// Local reaction rates at one cell.
    fn reaction(&self, a: f64, b: f64) -> (f64, f64);

    /// Fill both grids with the model's starting pattern.
    fn init(&self, a: &mut Grid, b: &mut Grid, rng: &mut dyn RngCore);

    /// Replace the defaults with values from a parameter string.
    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    LotkaVolterra,
    GrayScott,
    FitzhughNagumo,
    Barkley,
    Brusselator,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::LotkaVolterra,
        ReactionKind::GrayScott,
        ReactionKind::FitzhughNagumo,
        ReactionKind::Barkley,
        ReactionKind::Brusselator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::LotkaVolterra  => "lotka-volterra",
            ReactionKind::GrayScott      => "gray-scott",
            ReactionKind::FitzhughNagumo => "fitzhugh-nagumo",
            ReactionKind::Barkley        => "barkley",
            ReactionKind::Brusselator    => "brusselator",
        }
    }

    /// Model with default parameters.
    pub fn build(self) -> Box<dyn ReactionSystem> {
        match self {
            ReactionKind::LotkaVolterra  => Box::new(LotkaVolterra::default()),
            ReactionKind::GrayScott      => Box::new(GrayScott::default()),
            ReactionKind::FitzhughNagumo => Box::new(FitzhughNagumo::default()),
            ReactionKind::Barkley        => Box::new(Barkley::default()),
            ReactionKind::Brusselator    => Box::new(Brusselator::default()),
        }
    }

    /// Model with parameters parsed from `params`.
    pub fn build_with(self, params: &Parameters) -> Result<Box<dyn ReactionSystem>, SimulationError> {
        let mut system = self.build();
        system.set_parameters(params)?;
        info!(reaction = self.as_str(), parameters = %params, "reaction model loaded");
        Ok(system)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ReactionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| SimulationError::UnknownReaction(s.to_string()))
    }
}

/// Predator-prey kinetics.
#[derive(Debug, Clone, PartialEq)]
pub struct LotkaVolterra {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

impl Default for LotkaVolterra {
    fn default() -> Self {
        Self {
            alpha: 4.0 / 3.0,
            beta: 8.0 / 3.0,
            gamma: 1.0,
            delta: 1.0,
        }
    }
}

impl ReactionSystem for LotkaVolterra {
    fn name(&self) -> &'static str {
        ReactionKind::LotkaVolterra.as_str()
    }

    fn reaction(&self, a: f64, b: f64) -> (f64, f64) {
        (
            self.alpha * a - self.beta * a * b,
            self.delta * a * b - self.gamma * b,
        )
    }

    fn init(&self, a: &mut Grid, b: &mut Grid, rng: &mut dyn RngCore) {
        random_rectangles(a, b, rng);
    }

    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError> {
        self.alpha = params.require("alpha")?;
        self.beta = params.require("beta")?;
        self.gamma = params.require("gamma")?;
        self.delta = params.require("delta")?;
        Ok(())
    }
}

/// See Pearson, "Complex patterns in a simple system" (1993).
#[derive(Debug, Clone, PartialEq)]
pub struct GrayScott {
    /// Feed rate
    pub f: f64,
    /// Kill rate
    pub k: f64,
}

impl Default for GrayScott {
    fn default() -> Self {
        Self { f: 0.06, k: 0.0609 }
    }
}

impl ReactionSystem for GrayScott {
    fn name(&self) -> &'static str {
        ReactionKind::GrayScott.as_str()
    }

    fn reaction(&self, a: f64, b: f64) -> (f64, f64) {
        let r = a * b * b;
        (-r + self.f * (1.0 - a), r - (self.f + self.k) * b)
    }

    fn init(&self, a: &mut Grid, b: &mut Grid, rng: &mut dyn RngCore) {
        random_rectangles(a, b, rng);
    }

    // Both are optional; the defaults give moving spots.
    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError> {
        if let Some(f) = params.get("f") {
            self.f = f;
        }
        if let Some(k) = params.get("k") {
            self.k = k;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitzhughNagumo {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for FitzhughNagumo {
    fn default() -> Self {
        Self { alpha: -0.005, beta: 10.0 }
    }
}

impl ReactionSystem for FitzhughNagumo {
    fn name(&self) -> &'static str {
        ReactionKind::FitzhughNagumo.as_str()
    }

    fn reaction(&self, a: f64, b: f64) -> (f64, f64) {
        (a - a * a * a - b + self.alpha, (a - b) * self.beta)
    }

    fn init(&self, a: &mut Grid, b: &mut Grid, _rng: &mut dyn RngCore) {
        half_screen(a, b, 1.0, 0.1);
    }

    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError> {
        self.alpha = params.require("alpha")?;
        self.beta = params.require("beta")?;
        Ok(())
    }
}

/// See Barkley, Physica D 49 (1991) 61-70.
#[derive(Debug, Clone, PartialEq)]
pub struct Barkley {
    pub alpha: f64,
    pub beta: f64,
    pub epsilon: f64,
}

impl Default for Barkley {
    fn default() -> Self {
        Self {
            alpha: 0.75,
            beta: 0.06,
            epsilon: 50.0,
        }
    }
}

impl ReactionSystem for Barkley {
    fn name(&self) -> &'static str {
        ReactionKind::Barkley.as_str()
    }

    fn reaction(&self, a: f64, b: f64) -> (f64, f64) {
        (
            self.epsilon * a * (1.0 - a) * (a - (b + self.beta) / self.alpha),
            a * a * a - b,
        )
    }

    fn init(&self, a: &mut Grid, b: &mut Grid, _rng: &mut dyn RngCore) {
        half_screen(a, b, 1.0, self.alpha / 2.0);
    }

    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError> {
        let alpha = params.require("alpha")?;
        if alpha == 0.0 {
            return Err(SimulationError::InvalidParameters {
                params: params.to_string(),
                reason: "alpha must be non-zero".to_string(),
            });
        }
        self.alpha = alpha;
        self.beta = params.require("beta")?;
        self.epsilon = params.require("epsilon")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brusselator {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for Brusselator {
    fn default() -> Self {
        Self { alpha: 1.0, beta: 1.9 }
    }
}

impl ReactionSystem for Brusselator {
    fn name(&self) -> &'static str {
        ReactionKind::Brusselator.as_str()
    }

    fn reaction(&self, a: f64, b: f64) -> (f64, f64) {
        let a2b = a * a * b;
        (self.alpha - (self.beta + 1.0) * a + a2b, self.beta * a - a2b)
    }

    // Small noise around the homogeneous steady state (alpha, beta / alpha).
    fn init(&self, a: &mut Grid, b: &mut Grid, rng: &mut dyn RngCore) {
        random_around(a, b, self.alpha, self.beta / self.alpha, 0.3, rng);
    }

    fn set_parameters(&mut self, params: &Parameters) -> Result<(), SimulationError> {
        let alpha = params.require("alpha")?;
        if alpha == 0.0 {
            return Err(SimulationError::InvalidParameters {
                params: params.to_string(),
                reason: "alpha must be non-zero".to_string(),
            });
        }
        self.alpha = alpha;
        self.beta = params.require("beta")?;
        Ok(())
    }
}
