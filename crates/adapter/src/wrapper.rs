//! The control-suite to gym adapter.

use distractor::{build_source, BackgroundSource};
use image::RgbImage;
use spaces::{BoxSpace, Dtype};
use suite::{ControlEnvironment, Spec, TimeStep};

use crate::config::WrapperConfig;
use crate::gym::{GymEnv, Metadata, Obs, RenderMode, StepInfo, StepOutcome, METADATA};
use crate::observation::{apply_background, flatten_observation, spec_to_box, to_chw, to_hwc};
use crate::{AdapterError, Result};

/// Gym-style view of a control-suite task.
pub struct DmcWrapper {
    env: Box<dyn ControlEnvironment>,
    config: WrapperConfig,
    true_action_space: BoxSpace,
    norm_action_space: BoxSpace,
    observation_space: BoxSpace,
    internal_state_space: BoxSpace,
    background: Option<Box<dyn BackgroundSource>>,
}

impl DmcWrapper {
    /// Load the configured task from the default registry and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MissingSeed`] before anything is loaded if the
    /// seed is absent, and any error from task loading or distractor setup.
    pub fn new(config: WrapperConfig) -> Result<Self> {
        config.validate()?;
        let env = suite::load(
            &config.domain,
            &config.task,
            &config.task_kwargs,
            config.visualize_reward,
            &config.environment_kwargs,
        )?;
        Self::with_environment(config, env)
    }

    /// Wrap an already constructed environment.
    ///
    /// # Errors
    ///
    /// Same as [`DmcWrapper::new`], minus task loading.
    pub fn with_environment(config: WrapperConfig, env: Box<dyn ControlEnvironment>) -> Result<Self> {
        config.validate()?;
        let seed = config.seed()?;

        let true_action_space = spec_to_box([&Spec::Bounded(env.action_spec())])?;
        let norm_action_space = BoxSpace::uniform(true_action_space.shape(), -1.0, 1.0, Dtype::F32)?;

        let observation_space = if config.from_pixels {
            let shape = [3, config.height as usize, config.width as usize];
            BoxSpace::uniform(&shape, 0.0, 255.0, Dtype::U8)?
        } else {
            let specs = env.observation_spec();
            spec_to_box(specs.iter().map(|(_, spec)| spec))?
        };

        let internal_state_space = BoxSpace::unbounded(&[env.physics().get_state().len()]);

        let background = match config.distractor_type {
            Some(kind) => Some(build_source(
                kind,
                (config.height as usize, config.width as usize),
                config.distractor_files.as_deref(),
                config.total_frames,
                seed,
            )?),
            None => None,
        };

        tracing::info!(
            domain = %config.domain,
            task = %config.task,
            from_pixels = config.from_pixels,
            distractor = ?config.distractor_type,
            frame_skip = config.frame_skip,
            "Wrapped control task"
        );

        let mut wrapper = Self {
            env,
            config,
            true_action_space,
            norm_action_space,
            observation_space,
            internal_state_space,
            background,
        };
        wrapper.seed(seed);
        Ok(wrapper)
    }

    #[must_use]
    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Action bounds expected by the wrapped task.
    #[must_use]
    pub fn true_action_space(&self) -> &BoxSpace {
        &self.true_action_space
    }

    /// Unbounded space over the simulator state vector.
    #[must_use]
    pub fn internal_state_space(&self) -> &BoxSpace {
        &self.internal_state_space
    }

    #[must_use]
    pub fn metadata(&self) -> Metadata {
        METADATA
    }

    /// The wrapped environment, for anything the adapter does not expose.
    #[must_use]
    pub fn inner(&self) -> &dyn ControlEnvironment {
        self.env.as_ref()
    }

    pub fn inner_mut(&mut self) -> &mut dyn ControlEnvironment {
        self.env.as_mut()
    }

    /// Map a normalized action onto the true action bounds.
    ///
    /// Computed in double precision; extra elements beyond the action space
    /// are dropped.
    #[must_use]
    pub fn convert_action(&self, action: &[f32]) -> Vec<f32> {
        let norm = self.norm_action_space.low().iter().zip(self.norm_action_space.high());
        let truth = self.true_action_space.low().iter().zip(self.true_action_space.high());
        action
            .iter()
            .zip(norm.zip(truth))
            .map(|(&a, ((&nlow, &nhigh), (&tlow, &thigh)))| {
                let norm_delta = f64::from(nhigh) - f64::from(nlow);
                let true_delta = f64::from(thigh) - f64::from(tlow);
                let unit = (f64::from(a) - f64::from(nlow)) / norm_delta;
                (unit * true_delta + f64::from(tlow)) as f32
            })
            .collect()
    }

    /// Render with explicit size and camera.
    ///
    /// With pixel observations this returns a fresh observation frame
    /// (distractor included) and ignores the size and camera arguments.
    /// Otherwise `height`/`width` default to the configured size and a
    /// camera of `None` or `Some(0)` falls back to the configured camera.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::HumanRenderNeedsPixels`] for human mode without
    /// pixel observations, and any rendering error.
    pub fn render_with(
        &mut self,
        mode: RenderMode,
        height: Option<u32>,
        width: Option<u32>,
        camera_id: Option<u32>,
    ) -> Result<RgbImage> {
        if mode == RenderMode::Human && !self.config.from_pixels {
            return Err(AdapterError::HumanRenderNeedsPixels);
        }
        let frame = if self.config.from_pixels {
            let pixels = self.pixel_observation()?;
            to_hwc(&pixels)
        } else {
            self.render_physics(height, width, camera_id)?
        };
        if mode == RenderMode::Human {
            tracing::warn!("Render with mode=human returns the frame without opening a window");
        }
        Ok(frame)
    }

    fn render_physics(&self, height: Option<u32>, width: Option<u32>, camera_id: Option<u32>) -> Result<RgbImage> {
        let height = height.unwrap_or(self.config.height);
        let width = width.unwrap_or(self.config.width);
        let camera_id = match camera_id {
            Some(id) if id != 0 => id,
            _ => self.config.camera_id,
        };
        Ok(self.env.physics().render(height, width, camera_id)?)
    }

    fn pixel_observation(&mut self) -> Result<ndarray::Array3<u8>> {
        let mut frame = self.render_physics(None, None, None)?;
        if let Some(source) = self.background.as_mut() {
            let replaced = apply_background(&mut frame, source.get_image())?;
            tracing::trace!(replaced, "Pasted distractor background");
        }
        Ok(to_chw(&frame))
    }

    fn observation(&mut self, time_step: &TimeStep) -> Result<Obs> {
        if self.config.from_pixels {
            Ok(Obs::Pixels(self.pixel_observation()?))
        } else {
            Ok(Obs::Features(flatten_observation(&time_step.observation)))
        }
    }
}

impl GymEnv for DmcWrapper {
    fn action_space(&self) -> &BoxSpace {
        &self.norm_action_space
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    fn seed(&mut self, seed: u64) {
        self.true_action_space.seed(seed);
        self.norm_action_space.seed(seed);
        self.observation_space.seed(seed);
    }

    fn reset(&mut self) -> Result<Obs> {
        let time_step = self.env.reset();
        if self.config.resample_on_reset {
            if let Some(source) = self.background.as_mut() {
                source.reset();
            }
        }
        tracing::debug!(domain = %self.config.domain, task = %self.config.task, "Episode reset");
        self.observation(&time_step)
    }

    fn step(&mut self, action: &[f32]) -> Result<StepOutcome> {
        if !self.norm_action_space.contains(action) {
            return Err(AdapterError::ActionOutOfBounds(action.to_vec()));
        }
        let converted = self.convert_action(action);
        if !self.true_action_space.contains(&converted) {
            return Err(AdapterError::ConvertedActionOutOfBounds(converted));
        }
        let inner_action: Vec<f64> = converted.iter().map(|&a| f64::from(a)).collect();
        let internal_state = self.env.physics().get_state();

        let mut time_step = self.env.step(&inner_action)?;
        let mut reward = time_step.reward.unwrap_or(0.0);
        for _ in 1..self.config.frame_skip {
            if time_step.last() {
                break;
            }
            time_step = self.env.step(&inner_action)?;
            reward += time_step.reward.unwrap_or(0.0);
        }

        let obs = self.observation(&time_step)?;
        Ok(StepOutcome {
            obs,
            reward,
            done: time_step.last(),
            info: StepInfo { internal_state, discount: time_step.discount },
        })
    }

    fn render(&mut self, mode: RenderMode) -> Result<RgbImage> {
        self.render_with(mode, None, None, None)
    }
}
