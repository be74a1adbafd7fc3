//! Point-mass domain: drive a planar mass to a target at the arena centre.

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;

use crate::environment::{Environment, EnvironmentOptions, Physics, Simulation, Task, TaskOptions};
use crate::raster::{shade, Canvas, View};
use crate::rewards::{tolerance, Sigmoid};
use crate::specs::{ArraySpec, Bound, BoundedArraySpec, Dtype, Spec};
use crate::time_step::Observation;
use crate::{Result, SuiteError};

/// Default episode length in seconds.
pub const TIME_LIMIT: f64 = 20.0;

const MASS: f64 = 0.3;
const GEAR: f64 = 1.0;
const DAMPING: f64 = 1.0;
const ARENA: f64 = 0.3;
const TARGET_SIZE: f64 = 0.015;

/// Damped planar mass driven by two force actuators, confined to a square arena.
pub struct PointMass {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub control: [f64; 2],
    timestep: f64,
    time: f64,
    reward_tint: Option<f64>,
}

impl PointMass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: [0.0; 2],
            velocity: [0.0; 2],
            control: [0.0; 2],
            timestep: 0.02,
            time: 0.0,
            reward_tint: None,
        }
    }

    #[must_use]
    pub fn distance_to_target(&self) -> f64 {
        self.position[0].hypot(self.position[1])
    }
}

impl Default for PointMass {
    fn default() -> Self {
        Self::new()
    }
}

impl Physics for PointMass {
    fn get_state(&self) -> Vec<f64> {
        vec![self.position[0], self.position[1], self.velocity[0], self.velocity[1]]
    }

    fn render(&self, height: u32, width: u32, camera_id: u32) -> Result<RgbImage> {
        let view = match camera_id {
            0 => View { center_x: 0.0, center_y: 0.0, extent: 0.8 },
            1 => View {
                center_x: self.position[0] as f32,
                center_y: self.position[1] as f32,
                extent: 0.4,
            },
            other => return Err(SuiteError::InvalidCamera(other)),
        };
        let mut canvas = Canvas::new(height, width, view)?;
        canvas.sky();
        let wall = ARENA as f32 + 0.02;
        canvas.rect(-wall, -wall, wall, wall, Rgb([120, 104, 88]));
        canvas.floor_square(ARENA as f32);
        canvas.circle(0.0, 0.0, 0.03, Rgb([150, 200, 120]));
        let color = match self.reward_tint {
            Some(r) => shade(Rgb([110, 70, 40]), Rgb([240, 170, 80]), r),
            None => Rgb([220, 150, 70]),
        };
        canvas.circle(self.position[0] as f32, self.position[1] as f32, 0.02, color);
        Ok(canvas.into_image())
    }
}

impl Simulation for PointMass {
    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.velocity = [0.0; 2];
        self.control = [0.0; 2];
    }

    fn advance(&mut self) {
        for axis in 0..2 {
            let force = self.control[axis] * GEAR - DAMPING * self.velocity[axis];
            self.velocity[axis] += self.timestep * force / MASS;
            self.position[axis] += self.timestep * self.velocity[axis];
            if self.position[axis].abs() > ARENA {
                self.position[axis] = self.position[axis].clamp(-ARENA, ARENA);
                self.velocity[axis] = 0.0;
            }
        }
        self.time += self.timestep;
    }

    fn show_reward(&mut self, reward: f64) {
        self.reward_tint = Some(reward);
    }
}

/// Bring the mass to the target at the origin with little control effort.
pub struct Reach;

impl Task<PointMass> for Reach {
    fn action_spec(&self, _sim: &PointMass) -> BoundedArraySpec {
        BoundedArraySpec::new("control", &[2], Dtype::Float64, Bound::Scalar(-1.0), Bound::Scalar(1.0))
    }

    fn observation_spec(&self) -> Vec<(String, Spec)> {
        vec![
            ("position".to_string(), ArraySpec::new("position", &[2], Dtype::Float64).into()),
            ("velocity".to_string(), ArraySpec::new("velocity", &[2], Dtype::Float64).into()),
        ]
    }

    fn initialize_episode(&mut self, sim: &mut PointMass, rng: &mut StdRng) {
        let limit = ARENA - 0.01;
        sim.position = [rng.gen_range(-limit..limit), rng.gen_range(-limit..limit)];
    }

    fn before_step(&mut self, action: &[f64], sim: &mut PointMass) {
        for (c, a) in sim.control.iter_mut().zip(action) {
            *c = *a;
        }
    }

    fn get_observation(&self, sim: &PointMass) -> Observation {
        let mut obs = Observation::new();
        obs.insert("position", sim.position.to_vec());
        obs.insert("velocity", sim.velocity.to_vec());
        obs
    }

    fn get_reward(&self, sim: &PointMass) -> f64 {
        let near_target =
            tolerance(sim.distance_to_target(), (0.0, TARGET_SIZE), TARGET_SIZE, Sigmoid::Gaussian, 0.1);
        let control_reward = sim
            .control
            .iter()
            .map(|c| tolerance(*c, (0.0, 0.0), 1.0, Sigmoid::Quadratic, 0.0))
            .sum::<f64>()
            / 2.0;
        let small_control = (control_reward + 4.0) / 5.0;
        near_target * small_control
    }
}

/// Build the `point_mass/easy` environment.
#[must_use]
pub fn environment(
    task_options: &TaskOptions,
    visualize_reward: bool,
    options: &EnvironmentOptions,
) -> Environment<PointMass, Reach> {
    Environment::new(PointMass::new(), Reach, TIME_LIMIT, task_options, visualize_reward, options)
}
