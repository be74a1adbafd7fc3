//! Wrapper configuration, loadable from JSON.

use std::path::Path;

use distractor::DistractorKind;
use serde::{Deserialize, Serialize};
use suite::{EnvironmentOptions, TaskOptions};

use crate::{AdapterError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperConfig {
    /// Control-suite domain, e.g. `cartpole`.
    pub domain: String,
    pub task: String,
    /// Glob pattern for image/video distractors; `~` is expanded.
    #[serde(default)]
    pub distractor_files: Option<String>,
    #[serde(default)]
    pub distractor_type: Option<DistractorKind>,
    /// Frames preloaded by image/video distractors.
    #[serde(default)]
    pub total_frames: Option<usize>,
    /// `random` is required.
    #[serde(default)]
    pub task_kwargs: TaskOptions,
    #[serde(default)]
    pub visualize_reward: bool,
    #[serde(default)]
    pub from_pixels: bool,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default)]
    pub camera_id: u32,
    #[serde(default = "default_frame_skip")]
    pub frame_skip: usize,
    #[serde(default)]
    pub environment_kwargs: EnvironmentOptions,
    /// Draw a new colour, image or video start on every reset.
    #[serde(default)]
    pub resample_on_reset: bool,
}

fn default_size() -> u32 {
    84
}

fn default_frame_skip() -> usize {
    1
}

impl WrapperConfig {
    /// Defaults for `domain`/`task` with the given seed.
    #[must_use]
    pub fn new(domain: &str, task: &str, seed: u64) -> Self {
        Self {
            domain: domain.to_string(),
            task: task.to_string(),
            distractor_files: None,
            distractor_type: None,
            total_frames: None,
            task_kwargs: TaskOptions { random: Some(seed), ..TaskOptions::default() },
            visualize_reward: false,
            from_pixels: false,
            height: default_size(),
            width: default_size(),
            camera_id: 0,
            frame_skip: default_frame_skip(),
            environment_kwargs: EnvironmentOptions::default(),
            resample_on_reset: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`AdapterError::Io`] if the file cannot be read and
    /// [`AdapterError::Config`] on malformed JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The episode seed.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MissingSeed`] if `task_kwargs.random` is unset.
    pub fn seed(&self) -> Result<u64> {
        self.task_kwargs.random.ok_or(AdapterError::MissingSeed)
    }

    /// Check the configuration before any environment is built.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MissingSeed`] or
    /// [`AdapterError::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        self.seed()?;
        if self.frame_skip == 0 {
            return Err(AdapterError::InvalidConfig("frame_skip must be at least 1".into()));
        }
        if self.height == 0 || self.width == 0 {
            return Err(AdapterError::InvalidConfig(format!(
                "observation size must be non-zero, got {}x{}",
                self.height, self.width
            )));
        }
        Ok(())
    }
}
