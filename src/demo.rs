// WandWatch — Regression Demo Drivers
//
// Hardware-free state for the sine and linear regression demos.  The UI task
// (or the host simulator) calls these once per loop and plots the results.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::*;
use crate::error::ModelError;
use crate::model::{self, Model};

/// Sweeps `x` across the sine model's training range, one inference per step.
#[derive(Debug, Clone)]
pub struct SineSweep {
    inference_count: u32,
    inferences_per_cycle: u32,
}

impl SineSweep {
    pub fn new(inferences_per_cycle: u32) -> Self {
        Self {
            inference_count: 0,
            inferences_per_cycle: inferences_per_cycle.max(1),
        }
    }

    /// `x` the next step will feed the model.
    pub fn current_x(&self) -> f32 {
        let position = self.inference_count as f32 / self.inferences_per_cycle as f32;
        position * SINE_X_RANGE
    }

    /// Run one inference.  A failed invoke does not advance the sweep, so
    /// the same `x` is retried next time.
    pub fn step(&mut self) -> Result<(f32, f32), ModelError> {
        let x = self.current_x();
        let y = model::predict_sine(x)?;
        model::report(Model::Sine, x, y);

        self.inference_count += 1;
        if self.inference_count >= self.inferences_per_cycle {
            self.inference_count = 0;
        }
        Ok((x, y))
    }
}

impl Default for SineSweep {
    fn default() -> Self {
        Self::new(SINE_INFERENCES_PER_CYCLE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressionState {
    /// Prompt shown, waiting for a touch.
    Idle,
    /// Touched; the next `run` plots a batch.
    Running,
    /// Batch plotted; the next touch clears the screen.
    Done,
}

/// What the UI should do in response to a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Start,
    Reset,
    Ignored,
}

/// Touch-driven linear regression demo: one touch plots a batch of random
/// predictions, the next clears them.
#[derive(Debug, Clone)]
pub struct RegressionDemo<R = StdRng> {
    state: RegressionState,
    points_per_run: usize,
    rng: R,
}

impl RegressionDemo<StdRng> {
    /// Demo seeded from the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible demo, for tests and the simulator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for RegressionDemo<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RegressionDemo<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: RegressionState::Idle,
            points_per_run: REGRESSION_POINTS_PER_RUN,
            rng,
        }
    }

    pub fn state(&self) -> RegressionState {
        self.state
    }

    pub fn on_touch(&mut self) -> TouchAction {
        match self.state {
            RegressionState::Idle => {
                self.state = RegressionState::Running;
                TouchAction::Start
            }
            RegressionState::Done => {
                self.state = RegressionState::Idle;
                TouchAction::Reset
            }
            RegressionState::Running => TouchAction::Ignored,
        }
    }

    /// Predict a batch of random `x` in `[0, 1)` if a run is pending.
    ///
    /// Returns an empty batch when not running.  If an invoke fails the run
    /// stays pending and is retried whole on the next call.
    pub fn run(&mut self) -> Result<Vec<(f32, f32)>, ModelError> {
        if self.state != RegressionState::Running {
            return Ok(Vec::new());
        }

        let mut points = Vec::with_capacity(self.points_per_run);
        for _ in 0..self.points_per_run {
            let x: f32 = self.rng.random_range(0.0..1.0);
            let y = model::predict_linear(x)?;
            model::report(Model::Linear, x, y);
            points.push((x, y));
        }

        self.state = RegressionState::Done;
        Ok(points)
    }
}
