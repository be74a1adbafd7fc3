#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
//! # Control Suite
//!
//! The control-suite side of RedHerring: the interface a simulated control
//! task must provide before the adapter can expose it as an RL environment.
//!
//! ## Key Components
//!
//! -   **Specs:** [`ArraySpec`] and [`BoundedArraySpec`] describe the shape,
//!     dtype and bounds of actions and observations.
//! -   **Time steps:** every `reset`/`step` returns a [`TimeStep`] carrying the
//!     step type, optional reward and discount, and an ordered
//!     [`Observation`] dictionary.
//! -   **Environments:** [`ControlEnvironment`] is the task-level interface and
//!     [`Physics`] the handle used for state snapshots and rendering.
//! -   **Loading:** [`load`] resolves a `(domain, task)` pair through the
//!     default [`Registry`], which ships the `cartpole` and `point_mass`
//!     reference domains.
//!
//! ```rust,ignore
//! use suite::{load, EnvironmentOptions, TaskOptions};
//!
//! let task = TaskOptions { random: Some(1), ..TaskOptions::default() };
//! let mut env = load("cartpole", "swingup", &task, false, &EnvironmentOptions::default())?;
//! let first = env.reset();
//! let next = env.step(&[0.5])?;
//! ```

pub mod cartpole;
pub mod environment;
pub mod point_mass;
pub mod raster;
pub mod registry;
pub mod rewards;
pub mod specs;
pub mod time_step;

pub use environment::{ControlEnvironment, EnvironmentOptions, Physics, TaskOptions};
pub use registry::{load, Registry};
pub use specs::{ArraySpec, Bound, BoundedArraySpec, Dtype, Spec};
pub use time_step::{ObsValue, Observation, StepType, TimeStep};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("unknown task {domain}/{task}")]
    UnknownTask { domain: String, task: String },
    #[error("camera {0} does not exist")]
    InvalidCamera(u32),
    #[error("render size must be non-zero, got {height}x{width}")]
    InvalidRenderSize { height: u32, width: u32 },
    #[error("action has {actual} elements, expected {expected}")]
    ActionShape { expected: usize, actual: usize },
    #[error("bound has {actual} elements, expected 1 or {expected}")]
    BoundShape { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, SuiteError>;
