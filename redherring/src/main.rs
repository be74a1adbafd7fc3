//! # RedHerring
//!
//! Command-line entry point.
//!
//! - `rollout` -- run random-policy episodes, optionally dumping pixel frames
//! - `tasks`   -- list the registered control tasks
//! - `inspect` -- print the spaces a configuration produces

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Control-suite tasks with visual distractors behind a gym-style interface.
#[derive(Parser)]
#[command(name = "redherring", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes with uniformly random actions.
    Rollout {
        #[command(flatten)]
        env: EnvArgs,

        /// Number of episodes
        #[arg(long, default_value = "1")]
        episodes: usize,

        /// Directory for PNG frames (pixel observations only)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Save every n-th frame
        #[arg(long, default_value = "1")]
        save_every: usize,
    },

    /// List registered tasks.
    Tasks,

    /// Print action, observation and state spaces.
    Inspect {
        #[command(flatten)]
        env: EnvArgs,
    },
}

/// Wrapper configuration. Flags override values from `--config`; boolean
/// flags take an optional value, so `--from-pixels false` undoes a config file.
#[derive(Args, Debug, Default)]
pub struct EnvArgs {
    /// JSON wrapper configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long)]
    pub task: Option<String>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Observe rendered pixels instead of state features
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub from_pixels: Option<bool>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub camera_id: Option<u32>,

    #[arg(long)]
    pub frame_skip: Option<usize>,

    /// color, noise, images or video
    #[arg(long)]
    pub distractor: Option<String>,

    /// Glob pattern for image/video distractors
    #[arg(long)]
    pub distractor_files: Option<String>,

    #[arg(long)]
    pub total_frames: Option<usize>,

    /// Draw a new background every episode
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub resample_on_reset: Option<bool>,

    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub visualize_reward: Option<bool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rollout { env, episodes, out, save_every } => {
            let config = app::build_config(&env)?;
            app::rollout(config, episodes, out.as_deref(), save_every)
        }
        Commands::Tasks => {
            app::list_tasks();
            Ok(())
        }
        Commands::Inspect { env } => {
            let config = app::build_config(&env)?;
            app::inspect(config)
        }
    }
}
