#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Adapter
//!
//! Presents a control-suite task through a gym-style [`GymEnv`] interface.
//!
//! [`DmcWrapper`] does four things on top of the wrapped
//! [`suite::ControlEnvironment`]:
//!
//! -   rescales agent actions from `[-1, 1]` to the task's true action bounds,
//! -   flattens the observation dictionary into one feature vector, or renders
//!     a `3 x H x W` pixel observation instead,
//! -   repeats each action `frame_skip` times and sums the rewards,
//! -   optionally pastes a distractor background (see [`distractor`]) over the
//!     sky pixels of every rendered observation.
//!
//! ```rust,ignore
//! use adapter::{DmcWrapper, GymEnv, WrapperConfig};
//!
//! let mut config = WrapperConfig::new("cartpole", "swingup", 1);
//! config.from_pixels = true;
//! config.distractor_type = Some(distractor::DistractorKind::Noise);
//! let mut env = DmcWrapper::new(config)?;
//! let obs = env.reset()?;
//! let step = env.step(&env.action_space().clone().sample())?;
//! ```

pub mod config;
pub mod gym;
pub mod observation;
pub mod wrapper;

pub use config::WrapperConfig;
pub use gym::{GymEnv, Metadata, Obs, RenderMode, StepInfo, StepOutcome, METADATA};
pub use observation::{apply_background, flatten_observation, is_background, spec_to_box, to_chw, to_hwc};
pub use wrapper::DmcWrapper;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("task_kwargs.random must be set for deterministic behaviour")]
    MissingSeed,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("spec {name} has non-float dtype {dtype:?}")]
    NonFloatSpec { name: String, dtype: suite::Dtype },
    #[error("action {0:?} is outside the normalized action space")]
    ActionOutOfBounds(Vec<f32>),
    #[error("converted action {0:?} is outside the true action space")]
    ConvertedActionOutOfBounds(Vec<f32>),
    #[error("render mode {0} not supported")]
    UnknownRenderMode(String),
    #[error("human render mode requires pixel observations")]
    HumanRenderNeedsPixels,
    #[error("background is {bg_height}x{bg_width} but frame is {height}x{width}")]
    BackgroundShape {
        height: u32,
        width: u32,
        bg_height: usize,
        bg_width: usize,
    },
    #[error(transparent)]
    Suite(#[from] suite::SuiteError),
    #[error(transparent)]
    Distractor(#[from] distractor::DistractorError),
    #[error(transparent)]
    Space(#[from] spaces::SpaceError),
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
