//! Gym-style environment interface.

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use ndarray::Array3;
use spaces::BoxSpace;

use crate::{AdapterError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Return the frame.
    RgbArray,
    /// Show the frame to a person. Requires pixel observations.
    Human,
}

impl FromStr for RenderMode {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rgb_array" => Ok(RenderMode::RgbArray),
            "human" => Ok(RenderMode::Human),
            other => Err(AdapterError::UnknownRenderMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::RgbArray => "rgb_array",
            RenderMode::Human => "human",
        })
    }
}

/// Static environment metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub render_modes: &'static [&'static str],
    pub video_frames_per_second: u32,
}

pub const METADATA: Metadata = Metadata {
    render_modes: &["human", "rgb_array"],
    video_frames_per_second: 30,
};

/// An observation: either a `3 x H x W` image or a flat feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Obs {
    Pixels(Array3<u8>),
    Features(Vec<f32>),
}

impl Obs {
    /// The image, for pixel observations.
    #[must_use]
    pub fn pixels(&self) -> Option<&Array3<u8>> {
        match self {
            Obs::Pixels(p) => Some(p),
            Obs::Features(_) => None,
        }
    }

    /// The feature vector, for state observations.
    #[must_use]
    pub fn features(&self) -> Option<&[f32]> {
        match self {
            Obs::Features(f) => Some(f),
            Obs::Pixels(_) => None,
        }
    }

    /// Row-major values as floats, for space membership checks.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f32> {
        match self {
            Obs::Pixels(p) => p.iter().map(|&v| f32::from(v)).collect(),
            Obs::Features(f) => f.clone(),
        }
    }
}

/// Extra per-step information.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Simulator state before the action was applied.
    pub internal_state: Vec<f64>,
    /// Discount of the last inner time step.
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub obs: Obs,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Core RL environment interface.
pub trait GymEnv {
    /// Space of actions accepted by [`GymEnv::step`].
    fn action_space(&self) -> &BoxSpace;
    /// Space every returned observation belongs to.
    fn observation_space(&self) -> &BoxSpace;

    /// Seed every space's sampler.
    fn seed(&mut self, seed: u64);

    /// Start a new episode and return its first observation.
    ///
    /// # Errors
    ///
    /// Propagates rendering and simulation errors.
    fn reset(&mut self) -> Result<Obs>;

    /// Advance by one agent action.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::ActionOutOfBounds`] for an invalid action and
    /// propagates rendering and simulation errors.
    fn step(&mut self, action: &[f32]) -> Result<StepOutcome>;

    /// Render an `H x W x 3` frame.
    ///
    /// # Errors
    ///
    /// See the implementing environment.
    fn render(&mut self, mode: RenderMode) -> Result<RgbImage>;
}
