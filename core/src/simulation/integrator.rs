//! Explicit-Euler reaction-diffusion integrator on a periodic grid.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{SimulationConfig, StepPolicy};
use crate::headers::Header;
use crate::simulation::params::Parameters;
use crate::simulation::reaction::ReactionSystem;
use crate::simulation::SimulationError;
use crate::stream::grid::Grid;
use crate::stream::io::open_output;
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::writer::FrameWriter;
use crate::telemetry::{Stage, TelemetrySnapshot};
use crate::types::StreamError;

pub struct Simulation {
    config: SimulationConfig,
    system: Box<dyn ReactionSystem>,
    parallelism: ParallelismProfile,
    a: Grid,
    b: Grid,
    next_a: Grid,
    next_b: Grid,
    t: f64,
    updates: u64,
}

/// Read-only view shared by all workers during one update.
struct StepContext<'a> {
    a: &'a Grid,
    b: &'a Grid,
    system: &'a dyn ReactionSystem,
    da: f64,
    db: f64,
    dt: f64,
    inv_dx2: f64,
}

impl StepContext<'_> {
    /// Periodic 5-point Laplacian of `g` at `(i, j)`, unscaled.
    fn laplacian(g: &Grid, i: usize, j: usize) -> f64 {
        let (rows, cols) = g.shape();
        let up = if i == 0 { rows - 1 } else { i - 1 };
        let down = if i + 1 == rows { 0 } else { i + 1 };
        let left = if j == 0 { cols - 1 } else { j - 1 };
        let right = if j + 1 == cols { 0 } else { j + 1 };

        g[(up, j)] + g[(down, j)] + g[(i, left)] + g[(i, right)] - 4.0 * g[(i, j)]
    }

    /// Compute rows `first..` into `out_a`/`out_b`, which hold whole rows.
    fn step_rows(&self, first: usize, out_a: &mut [f64], out_b: &mut [f64]) {
        let cols = self.a.cols();
        for (k, (va, vb)) in out_a.iter_mut().zip(out_b.iter_mut()).enumerate() {
            let (i, j) = (first + k / cols, k % cols);
            let (ca, cb) = (self.a[(i, j)], self.b[(i, j)]);
            let (ra, rb) = self.system.reaction(ca, cb);

            *va = ca + self.dt * (self.da * Self::laplacian(self.a, i, j) * self.inv_dx2 + ra);
            *vb = cb + self.dt * (self.db * Self::laplacian(self.b, i, j) * self.inv_dx2 + rb);
        }
    }
}

/// Periodic Laplacian of the whole grid, scaled by `1 / dx^2`.
pub fn laplacian(g: &Grid, dx: f64) -> Grid {
    let (rows, cols) = g.shape();
    let inv_dx2 = 1.0 / (dx * dx);
    let mut out = Grid::zeros(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            out[(i, j)] = StepContext::laplacian(g, i, j) * inv_dx2;
        }
    }
    out
}

impl Simulation {
    /// Validate `config`, build its reaction model, and lay down the initial state.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let params = Parameters::parse(&config.parameters)?;
        let system = config.reaction_kind()?.build_with(&params)?;
        Self::with_system(config, system)
    }

    /// Like [`Simulation::new`] but with a caller-supplied model; the config's
    /// `reaction` and `parameters` are not consulted. Everything else is
    /// validated.
    pub fn with_system(config: SimulationConfig, system: Box<dyn ReactionSystem>) -> Result<Self, SimulationError> {
        let (rows, cols) = (config.height as usize, config.width as usize);
        if rows == 0 || cols == 0 {
            return Err(SimulationError::InvalidGrid { width: config.width, height: config.height });
        }
        config.validate_numerics()?;

        if !config.is_stable() {
            warn!(
                diffusion_number = config.diffusion_number(),
                "dt * max(Da, Db) / dx^2 exceeds 0.25, explicit scheme may diverge"
            );
        }

        let mut a = Grid::zeros(rows, cols);
        let mut b = Grid::zeros(rows, cols);
        let mut rng = StdRng::seed_from_u64(config.seed);
        system.init(&mut a, &mut b, &mut rng);

        let parallelism = ParallelismProfile::for_rows(config.threads, rows);
        info!(
            reaction = system.name(),
            width = config.width,
            height = config.height,
            workers = parallelism.worker_count,
            "simulation initialised"
        );

        Ok(Self {
            system,
            parallelism,
            next_a: Grid::zeros(rows, cols),
            next_b: Grid::zeros(rows, cols),
            a,
            b,
            config,
            t: 0.0,
            updates: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn system(&self) -> &dyn ReactionSystem {
        &*self.system
    }

    pub fn parallelism(&self) -> ParallelismProfile {
        self.parallelism
    }

    /// Override the worker count chosen from the config.
    pub fn set_parallelism(&mut self, profile: ParallelismProfile) {
        self.parallelism = profile;
    }

    pub fn a(&self) -> &Grid {
        &self.a
    }

    pub fn b(&self) -> &Grid {
        &self.b
    }

    /// Simulated time.
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Header describing this run's output.
    pub fn header(&self) -> Header {
        Header::new(
            self.config.width as i32,
            self.config.height as i32,
            self.config.steps as i32,
        )
    }

    /// One Euler step over the whole grid.
    pub fn update(&mut self) -> Result<(), SimulationError> {
        let Self { config, system, parallelism, a, b, next_a, next_b, .. } = self;
        let ctx = StepContext {
            a: &*a,
            b: &*b,
            system: &**system,
            da: config.da,
            db: config.db,
            dt: config.dt,
            inv_dx2: 1.0 / (config.dx * config.dx),
        };

        let cols = a.cols();
        let bands = parallelism.row_bands(a.rows());
        if bands.len() <= 1 {
            ctx.step_rows(0, next_a.as_mut_slice(), next_b.as_mut_slice());
        } else {
            let mut jobs = Vec::with_capacity(bands.len());
            let mut rest_a = next_a.as_mut_slice();
            let mut rest_b = next_b.as_mut_slice();
            for &(start, end) in &bands {
                let n = (end - start) * cols;
                let (band_a, tail_a) = std::mem::take(&mut rest_a).split_at_mut(n);
                let (band_b, tail_b) = std::mem::take(&mut rest_b).split_at_mut(n);
                rest_a = tail_a;
                rest_b = tail_b;
                jobs.push((start, band_a, band_b));
            }

            let ctx = &ctx;
            crossbeam::scope(|scope| {
                for (start, band_a, band_b) in jobs {
                    scope.spawn(move |_| ctx.step_rows(start, band_a, band_b));
                }
            })
            .map_err(|_| SimulationError::WorkerPanicked)?;
        }

        std::mem::swap(&mut self.a, &mut self.next_a);
        std::mem::swap(&mut self.b, &mut self.next_b);
        self.t += self.config.dt;
        self.updates += 1;
        Ok(())
    }

    /// `n` Euler steps.
    pub fn advance(&mut self, n: u32) -> Result<(), SimulationError> {
        for _ in 0..n {
            self.update()?;
        }
        Ok(())
    }

    /// Write the current state as frame 0, then a frame after every
    /// `tsteps` updates until the writer has all `steps + 1` frames.
    pub fn run<W: Write>(&mut self, writer: &mut FrameWriter<W>) -> Result<(), StreamError> {
        if writer.policy() != StepPolicy::Inclusive {
            return Err(StreamError::InvalidState("simulation output uses the inclusive step policy"));
        }
        if *writer.header() != self.header() {
            return Err(StreamError::InvalidState("writer header does not match the simulation"));
        }

        writer.write_fields(&self.a, &self.b)?;
        while writer.frames_remaining() > 0 {
            let started = Instant::now();
            self.advance(self.config.tsteps)?;
            writer.add_stage_time(Stage::Integrate, started.elapsed());
            writer.add_integration_steps(u64::from(self.config.tsteps));

            let index = writer.write_fields(&self.a, &self.b)?;
            debug!(index, t = self.t, "snapshot");
        }
        Ok(())
    }

    /// Run into any sink and return the sink plus telemetry.
    pub fn run_to_writer<W: Write>(&mut self, sink: W) -> Result<(W, TelemetrySnapshot), StreamError> {
        let mut writer = FrameWriter::new(sink, self.header(), StepPolicy::Inclusive)?;
        self.run(&mut writer)?;
        writer.finish()
    }

    pub fn run_to_file(&mut self, path: impl AsRef<Path>) -> Result<TelemetrySnapshot, StreamError> {
        let path = path.as_ref();
        let sink = open_output(path)?;
        let (_, snapshot) = self.run_to_writer(sink)?;
        info!(path = %path.display(), "simulation written");
        Ok(snapshot)
    }
}

/// Build a simulation from `config` and write it to `path`, charging setup
/// time to [`Stage::Initialize`].
pub fn simulate_to_file(config: SimulationConfig, path: impl AsRef<Path>) -> Result<TelemetrySnapshot, StreamError> {
    let started = Instant::now();
    let mut sim = Simulation::new(config)?;
    let init = started.elapsed();

    let path = path.as_ref();
    let sink = open_output(path)?;
    let mut writer = FrameWriter::new(sink, sim.header(), StepPolicy::Inclusive)?.started_at(started);
    writer.add_stage_time(Stage::Initialize, init);
    sim.run(&mut writer)?;
    let (_, snapshot) = writer.finish()?;
    info!(path = %path.display(), frames = snapshot.frames, "simulation written");
    Ok(snapshot)
}
