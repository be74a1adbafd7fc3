//! Cart-pole domain: swing up and balance an unactuated pole by pushing a cart.
//!
//! The dynamics are the textbook frictionless cart-pole with a continuous
//! force actuator. The pole angle is measured from upright.

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::environment::{Environment, EnvironmentOptions, Physics, Simulation, Task, TaskOptions};
use crate::raster::{shade, Canvas, View};
use crate::rewards::{tolerance, Sigmoid};
use crate::specs::{ArraySpec, Bound, BoundedArraySpec, Dtype, Spec};
use crate::time_step::Observation;
use crate::{Result, SuiteError};

/// Default episode length in seconds.
pub const TIME_LIMIT: f64 = 10.0;

/// Configuration for a cart-pole system.
#[derive(Clone, Debug)]
pub struct CartPoleConfig {
    /// Cart half-extents (width, height) in metres
    pub cart_size: (f64, f64),
    /// Cart mass in kg
    pub cart_mass: f64,
    /// Pole length in metres, hinge to tip
    pub pole_length: f64,
    /// Pole mass in kg
    pub pole_mass: f64,
    /// Force in newtons at full actuation
    pub force_magnitude: f64,
    /// Rail half-length; the cart stops dead at either end
    pub rail_limit: f64,
    /// Hinge height above the floor
    pub rail_height: f64,
    pub gravity: f64,
    /// Integrator step in seconds
    pub timestep: f64,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            cart_size: (0.2, 0.1),
            cart_mass: 1.0,
            pole_length: 1.0,
            pole_mass: 0.1,
            force_magnitude: 10.0,
            rail_limit: 1.8,
            rail_height: 1.0,
            gravity: 9.81,
            timestep: 0.01,
        }
    }
}

/// Cart-pole simulation state.
pub struct CartPole {
    pub config: CartPoleConfig,
    /// Cart position along the rail
    pub x: f64,
    pub x_dot: f64,
    /// Pole angle from vertical (radians)
    pub theta: f64,
    pub theta_dot: f64,
    /// Normalised actuator input in [-1, 1]
    pub control: f64,
    time: f64,
    reward_tint: Option<f64>,
}

impl CartPole {
    #[must_use]
    pub fn new(config: CartPoleConfig) -> Self {
        Self {
            config,
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            control: 0.0,
            time: 0.0,
            reward_tint: None,
        }
    }

    /// Cosine of the pole angle; 1 when upright.
    #[must_use]
    pub fn pole_angle_cosine(&self) -> f64 {
        self.theta.cos()
    }

    /// Hinge and tip positions in world coordinates.
    fn pole_endpoints(&self) -> ((f32, f32), (f32, f32)) {
        let hinge = (self.x as f32, self.config.rail_height as f32);
        let l = self.config.pole_length;
        let tip = (
            (self.x + l * self.theta.sin()) as f32,
            (self.config.rail_height + l * self.theta.cos()) as f32,
        );
        (hinge, tip)
    }
}

impl Physics for CartPole {
    fn get_state(&self) -> Vec<f64> {
        vec![self.x, self.theta, self.x_dot, self.theta_dot]
    }

    fn render(&self, height: u32, width: u32, camera_id: u32) -> Result<RgbImage> {
        let center_y = self.config.rail_height as f32 + 0.2;
        let view = match camera_id {
            0 => View { center_x: 0.0, center_y, extent: 3.2 },
            // Tracks the cart.
            1 => View { center_x: self.x as f32, center_y, extent: 2.4 },
            other => return Err(SuiteError::InvalidCamera(other)),
        };
        let mut canvas = Canvas::new(height, width, view)?;
        canvas.sky();
        canvas.floor_below(0.0);

        let rail_y = self.config.rail_height as f32;
        let rail = self.config.rail_limit as f32 + self.config.cart_size.0 as f32;
        canvas.rect(-rail, rail_y - 0.015, rail, rail_y + 0.015, Rgb([70, 68, 64]));

        let (hw, hh) = (self.config.cart_size.0 as f32, self.config.cart_size.1 as f32);
        let cart_color = match self.reward_tint {
            Some(r) => shade(Rgb([96, 56, 28]), Rgb([236, 156, 64]), r),
            None => Rgb([178, 112, 56]),
        };
        let cx = self.x as f32;
        canvas.rect(cx - hw, rail_y - hh, cx + hw, rail_y + hh, cart_color);

        let (hinge, tip) = self.pole_endpoints();
        canvas.segment(hinge, tip, 0.045, Rgb([204, 164, 112]));
        Ok(canvas.into_image())
    }
}

impl Simulation for CartPole {
    fn timestep(&self) -> f64 {
        self.config.timestep
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.x_dot = 0.0;
        self.theta_dot = 0.0;
        self.control = 0.0;
    }

    fn advance(&mut self) {
        let c = &self.config;
        let total_mass = c.cart_mass + c.pole_mass;
        let half_length = c.pole_length / 2.0;
        let pole_mass_length = c.pole_mass * half_length;
        let force = self.control * c.force_magnitude;

        let (sin, cos) = self.theta.sin_cos();
        let temp = (force + pole_mass_length * self.theta_dot * self.theta_dot * sin) / total_mass;
        let theta_acc = (c.gravity * sin - cos * temp)
            / (half_length * (4.0 / 3.0 - c.pole_mass * cos * cos / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos / total_mass;

        // Semi-implicit Euler
        self.x_dot += c.timestep * x_acc;
        self.theta_dot += c.timestep * theta_acc;
        self.x += c.timestep * self.x_dot;
        self.theta += c.timestep * self.theta_dot;

        if self.x.abs() > c.rail_limit {
            self.x = self.x.clamp(-c.rail_limit, c.rail_limit);
            self.x_dot = 0.0;
        }
        self.time += c.timestep;
    }

    fn show_reward(&mut self, reward: f64) {
        self.reward_tint = Some(reward);
    }
}

/// Balance (pole starts near upright) or swing-up (pole starts hanging).
pub struct Balance {
    swing_up: bool,
}

impl Balance {
    #[must_use]
    pub fn new(swing_up: bool) -> Self {
        Self { swing_up }
    }
}

impl Task<CartPole> for Balance {
    fn action_spec(&self, _sim: &CartPole) -> BoundedArraySpec {
        BoundedArraySpec::new("slider", &[1], Dtype::Float64, Bound::Scalar(-1.0), Bound::Scalar(1.0))
    }

    fn observation_spec(&self) -> Vec<(String, Spec)> {
        vec![
            ("position".to_string(), ArraySpec::new("position", &[3], Dtype::Float64).into()),
            ("velocity".to_string(), ArraySpec::new("velocity", &[2], Dtype::Float64).into()),
        ]
    }

    fn initialize_episode(&mut self, sim: &mut CartPole, rng: &mut StdRng) {
        if self.swing_up {
            sim.x = 0.01 * gaussian(rng);
            sim.theta = std::f64::consts::PI + 0.01 * gaussian(rng);
        } else {
            sim.x = rng.gen_range(-0.1..0.1);
            sim.theta = rng.gen_range(-0.034..0.034);
        }
        sim.x_dot = 0.01 * gaussian(rng);
        sim.theta_dot = 0.01 * gaussian(rng);
    }

    fn before_step(&mut self, action: &[f64], sim: &mut CartPole) {
        sim.control = action.first().copied().unwrap_or(0.0);
    }

    fn get_observation(&self, sim: &CartPole) -> Observation {
        let mut obs = Observation::new();
        obs.insert("position", vec![sim.x, sim.theta.cos(), sim.theta.sin()]);
        obs.insert("velocity", vec![sim.x_dot, sim.theta_dot]);
        obs
    }

    fn get_reward(&self, sim: &CartPole) -> f64 {
        let upright = (sim.pole_angle_cosine() + 1.0) / 2.0;
        let centered = (1.0 + tolerance(sim.x, (0.0, 0.0), 2.0, Sigmoid::Gaussian, 0.1)) / 2.0;
        let small_control =
            (4.0 + tolerance(sim.control, (0.0, 0.0), 1.0, Sigmoid::Quadratic, 0.0)) / 5.0;
        let small_velocity =
            (1.0 + tolerance(sim.theta_dot, (0.0, 0.0), 5.0, Sigmoid::Gaussian, 0.1)) / 2.0;
        upright * centered * small_control * small_velocity
    }
}

fn gaussian(rng: &mut StdRng) -> f64 {
    rng.sample(StandardNormal)
}

/// Build a cart-pole environment for `balance` or `swingup`.
#[must_use]
pub fn environment(
    swing_up: bool,
    task_options: &TaskOptions,
    visualize_reward: bool,
    options: &EnvironmentOptions,
) -> Environment<CartPole, Balance> {
    Environment::new(
        CartPole::new(CartPoleConfig::default()),
        Balance::new(swing_up),
        TIME_LIMIT,
        task_options,
        visualize_reward,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unactuated_pole_falls_from_near_upright() {
        let mut sim = CartPole::new(CartPoleConfig::default());
        sim.theta = 0.05;
        for _ in 0..100 {
            sim.advance();
        }
        assert!(sim.theta.abs() > 0.5);
    }

    #[test]
    fn cart_stops_at_rail_end() {
        let mut sim = CartPole::new(CartPoleConfig::default());
        sim.control = 1.0;
        for _ in 0..2000 {
            sim.advance();
        }
        assert!(sim.x <= sim.config.rail_limit);
    }
}
