//! Subcommand implementations.

use std::path::Path;

use adapter::{to_hwc, DmcWrapper, GymEnv, Obs, WrapperConfig};
use anyhow::{bail, Context, Result};
use distractor::DistractorKind;
use spaces::BoxSpace;

use crate::EnvArgs;

const DEFAULT_DOMAIN: &str = "cartpole";
const DEFAULT_TASK: &str = "swingup";
const DEFAULT_SEED: u64 = 1;

/// Merge the JSON file (if any) with command-line overrides.
pub fn build_config(args: &EnvArgs) -> Result<WrapperConfig> {
    let mut config = match &args.config {
        Some(path) => WrapperConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => WrapperConfig::new(DEFAULT_DOMAIN, DEFAULT_TASK, DEFAULT_SEED),
    };

    if let Some(domain) = &args.domain {
        config.domain.clone_from(domain);
    }
    if let Some(task) = &args.task {
        config.task.clone_from(task);
    }
    if let Some(seed) = args.seed {
        config.task_kwargs.random = Some(seed);
    }
    if let Some(from_pixels) = args.from_pixels {
        config.from_pixels = from_pixels;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(camera_id) = args.camera_id {
        config.camera_id = camera_id;
    }
    if let Some(frame_skip) = args.frame_skip {
        config.frame_skip = frame_skip;
    }
    if let Some(kind) = &args.distractor {
        let kind: DistractorKind = kind.parse()?;
        config.distractor_type = Some(kind);
    }
    if let Some(files) = &args.distractor_files {
        config.distractor_files = Some(files.clone());
    }
    if let Some(total_frames) = args.total_frames {
        config.total_frames = Some(total_frames);
    }
    if let Some(resample_on_reset) = args.resample_on_reset {
        config.resample_on_reset = resample_on_reset;
    }
    if let Some(visualize_reward) = args.visualize_reward {
        config.visualize_reward = visualize_reward;
    }

    config.validate()?;
    Ok(config)
}

/// Run `episodes` episodes with uniformly random normalized actions.
pub fn rollout(config: WrapperConfig, episodes: usize, out: Option<&Path>, save_every: usize) -> Result<()> {
    if save_every == 0 {
        bail!("--save-every must be at least 1");
    }
    if out.is_some() && !config.from_pixels {
        tracing::warn!("--out ignored: frames are only saved for pixel observations");
    }
    if let Some(dir) = out {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut env = DmcWrapper::new(config)?;
    let mut policy = env.action_space().clone();

    for episode in 0..episodes {
        let mut obs = env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0usize;
        loop {
            if let (Some(dir), Obs::Pixels(pixels)) = (out, &obs) {
                if steps % save_every == 0 {
                    let path = dir.join(format!("ep{episode:03}_step{steps:05}.png"));
                    to_hwc(pixels)
                        .save(&path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }

            let outcome = env.step(&policy.sample())?;
            total_reward += outcome.reward;
            steps += 1;
            obs = outcome.obs;
            if outcome.done {
                break;
            }
        }
        tracing::info!(episode, steps, total_reward, "Episode finished");
    }
    Ok(())
}

pub fn list_tasks() {
    for (domain, task) in suite::Registry::with_defaults().tasks() {
        println!("{domain}/{task}");
    }
}

/// Print the spaces of the configured environment.
pub fn inspect(config: WrapperConfig) -> Result<()> {
    let env = DmcWrapper::new(config)?;
    println!("action:       {}", describe(env.action_space()));
    println!("true action:  {}", describe(env.true_action_space()));
    println!("observation:  {}", describe(env.observation_space()));
    println!("state:        {}", describe(env.internal_state_space()));
    Ok(())
}

fn describe(space: &BoxSpace) -> String {
    let bound = |values: &[f32], pick: fn(f32, f32) -> f32| values.iter().copied().reduce(pick);
    match (bound(space.low(), f32::min), bound(space.high(), f32::max)) {
        (Some(low), Some(high)) => {
            format!("{:?} shape={:?} low>={low} high<={high}", space.dtype(), space.shape())
        }
        _ => format!("{:?} shape={:?} (empty)", space.dtype(), space.shape()),
    }
}
