//! Environment-level interfaces and the generic episode loop.
//!
//! A reference domain is split the way control suites usually are: a
//! [`Simulation`] owns the integrator state and can render itself, and a
//! [`Task`] decides how episodes start, what is observed and how they are
//! scored. [`Environment`] ties the two together and handles sub-stepping and
//! time limits, exposing the result as a [`ControlEnvironment`].

use image::RgbImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::specs::{ArraySpec, BoundedArraySpec, Dtype, Spec};
use crate::time_step::{Observation, TimeStep};
use crate::{Result, SuiteError};

/// Handle on the simulated world.
pub trait Physics {
    /// Full simulator state (positions then velocities).
    fn get_state(&self) -> Vec<f64>;

    /// Render an RGB frame from the given camera.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::InvalidCamera`] for an unknown camera and
    /// [`SuiteError::InvalidRenderSize`] for an empty frame.
    fn render(&self, height: u32, width: u32, camera_id: u32) -> Result<RgbImage>;
}

/// Task-level interface a control environment exposes.
pub trait ControlEnvironment {
    fn action_spec(&self) -> BoundedArraySpec;

    /// Observation entries, in the order observations are produced.
    fn observation_spec(&self) -> Vec<(String, Spec)>;

    /// Start a new episode.
    fn reset(&mut self) -> TimeStep;

    /// Apply one control action.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::ActionShape`] if the action has the wrong size.
    fn step(&mut self, action: &[f64]) -> Result<TimeStep>;

    fn physics(&self) -> &dyn Physics;

    /// Seconds of simulated time per control step.
    fn control_timestep(&self) -> f64;
}

/// Options forwarded to the task constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOptions {
    /// Seed for episode initialisation.
    pub random: Option<u64>,
    /// Episode length in seconds of simulated time.
    pub time_limit: Option<f64>,
}

/// Options forwarded to the environment constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentOptions {
    /// Physics steps per control step.
    pub n_sub_steps: Option<usize>,
    /// Concatenate every observation into a single `observations` entry.
    pub flat_observation: bool,
}

/// Integrator side of a reference domain.
pub trait Simulation: Physics {
    /// Integrator step in seconds.
    fn timestep(&self) -> f64;
    fn time(&self) -> f64;
    /// Zero the clock and velocities ahead of episode initialisation.
    fn reset(&mut self);
    /// Advance one integrator step with the current control.
    fn advance(&mut self);
    /// Colour bodies by the latest reward, if reward visualisation is on.
    fn show_reward(&mut self, _reward: f64) {}
}

/// Scoring side of a reference domain.
pub trait Task<S: Simulation> {
    fn action_spec(&self, sim: &S) -> BoundedArraySpec;
    fn observation_spec(&self) -> Vec<(String, Spec)>;
    fn initialize_episode(&mut self, sim: &mut S, rng: &mut StdRng);
    fn before_step(&mut self, action: &[f64], sim: &mut S);
    fn get_observation(&self, sim: &S) -> Observation;
    fn get_reward(&self, sim: &S) -> f64;

    /// `Some(discount)` ends the episode early.
    fn get_termination(&self, _sim: &S) -> Option<f64> {
        None
    }
}

/// Generic episode loop over a simulation and a task.
pub struct Environment<S, T> {
    sim: S,
    task: T,
    rng: StdRng,
    n_sub_steps: usize,
    time_limit: f64,
    flat_observation: bool,
    visualize_reward: bool,
    reset_next_step: bool,
}

impl<S: Simulation, T: Task<S>> Environment<S, T> {
    pub fn new(
        sim: S,
        task: T,
        default_time_limit: f64,
        task_options: &TaskOptions,
        visualize_reward: bool,
        options: &EnvironmentOptions,
    ) -> Self {
        let rng = match task_options.random {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            sim,
            task,
            rng,
            n_sub_steps: options.n_sub_steps.unwrap_or(1).max(1),
            time_limit: task_options.time_limit.unwrap_or(default_time_limit),
            flat_observation: options.flat_observation,
            visualize_reward,
            reset_next_step: true,
        }
    }

    #[must_use]
    pub fn simulation(&self) -> &S {
        &self.sim
    }

    fn observe(&self) -> Observation {
        let observation = self.task.get_observation(&self.sim);
        if !self.flat_observation {
            return observation;
        }
        let flat: Vec<f64> = observation.values().flat_map(crate::ObsValue::to_flat).collect();
        let mut merged = Observation::new();
        merged.insert("observations", flat);
        merged
    }
}

impl<S: Simulation, T: Task<S>> ControlEnvironment for Environment<S, T> {
    fn action_spec(&self) -> BoundedArraySpec {
        self.task.action_spec(&self.sim)
    }

    fn observation_spec(&self) -> Vec<(String, Spec)> {
        let specs = self.task.observation_spec();
        if !self.flat_observation {
            return specs;
        }
        let total = specs.iter().map(|(_, s)| s.num_values()).sum::<usize>();
        vec![(
            "observations".to_string(),
            ArraySpec::new("observations", &[total], Dtype::Float64).into(),
        )]
    }

    fn reset(&mut self) -> TimeStep {
        self.reset_next_step = false;
        self.sim.reset();
        self.task.initialize_episode(&mut self.sim, &mut self.rng);
        if self.visualize_reward {
            self.sim.show_reward(0.0);
        }
        TimeStep::restart(self.observe())
    }

    fn step(&mut self, action: &[f64]) -> Result<TimeStep> {
        if self.reset_next_step {
            return Ok(self.reset());
        }
        let spec = self.action_spec();
        let n = spec.num_values();
        if action.len() != n {
            return Err(SuiteError::ActionShape { expected: n, actual: action.len() });
        }
        let lo = spec.minimum.broadcast(n)?;
        let hi = spec.maximum.broadcast(n)?;
        let clipped: Vec<f64> = action
            .iter()
            .zip(lo.iter().zip(&hi))
            .map(|(a, (l, h))| a.clamp(*l, *h))
            .collect();

        self.task.before_step(&clipped, &mut self.sim);
        for _ in 0..self.n_sub_steps {
            self.sim.advance();
        }

        let reward = self.task.get_reward(&self.sim);
        if self.visualize_reward {
            self.sim.show_reward(reward);
        }
        let observation = self.observe();

        if let Some(discount) = self.task.get_termination(&self.sim) {
            self.reset_next_step = true;
            return Ok(TimeStep::truncation(reward, discount, observation));
        }
        // Half a step of slack keeps float drift from adding an extra step.
        if self.sim.time() + 0.5 * self.control_timestep() >= self.time_limit {
            self.reset_next_step = true;
            return Ok(TimeStep::truncation(reward, 1.0, observation));
        }
        Ok(TimeStep::transition(reward, 1.0, observation))
    }

    fn physics(&self) -> &dyn Physics {
        &self.sim
    }

    fn control_timestep(&self) -> f64 {
        self.sim.timestep() * self.n_sub_steps as f64
    }
}
