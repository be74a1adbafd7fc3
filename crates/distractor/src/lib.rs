#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Distractor Sources
//!
//! Backgrounds that are pasted behind the agent in pixel observations to test
//! how robust a policy is to visual clutter.
//!
//! Four sources are provided, selected by [`DistractorKind`]:
//!
//! -   [`RandomColorSource`]: one solid colour per episode.
//! -   [`NoiseSource`]: fresh Gaussian noise on every frame.
//! -   [`RandomImageSource`]: one still image per episode, drawn from a
//!     preloaded pool.
//! -   [`RandomVideoSource`]: consecutive frames of a preloaded clip pool,
//!     starting at a random frame each episode.
//!
//! Every source owns its RNG so a seeded adapter produces the same
//! background sequence on every run.

pub mod background;
pub mod color;
pub mod files;
pub mod images;
pub mod noise;
pub mod video;

pub use background::{Background, BackgroundSource};
pub use color::RandomColorSource;
pub use files::expand_pattern;
pub use images::RandomImageSource;
pub use noise::NoiseSource;
pub use video::RandomVideoSource;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistractorError {
    #[error("distractor type {0} not defined")]
    UnknownKind(String),
    #[error("{0} distractors need a file pattern")]
    MissingPattern(DistractorKind),
    #[error("pattern {0} does not match any files")]
    NoMatches(String),
    #[error("invalid file pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),
    #[error("failed to load {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no frames could be read from the given files")]
    NoFrames,
    #[error("decoded frame does not fit the background: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("background size must be non-zero, got {0}x{1}")]
    EmptyShape(usize, usize),
}

pub type Result<T> = std::result::Result<T, DistractorError>;

/// Which background replaces the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistractorKind {
    Color,
    Noise,
    Images,
    Video,
}

impl DistractorKind {
    /// Whether the source reads files from disk.
    #[must_use]
    pub fn needs_files(self) -> bool {
        matches!(self, DistractorKind::Images | DistractorKind::Video)
    }
}

impl fmt::Display for DistractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistractorKind::Color => "color",
            DistractorKind::Noise => "noise",
            DistractorKind::Images => "images",
            DistractorKind::Video => "video",
        };
        f.write_str(name)
    }
}

impl FromStr for DistractorKind {
    type Err = DistractorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "color" => Ok(DistractorKind::Color),
            "noise" => Ok(DistractorKind::Noise),
            "images" => Ok(DistractorKind::Images),
            "video" => Ok(DistractorKind::Video),
            other => Err(DistractorError::UnknownKind(other.to_string())),
        }
    }
}

/// Build the source for `kind` producing `(height, width)` backgrounds.
///
/// Image and video sources are always loaded in grayscale and expand
/// `pattern` (which must match at least one file).
///
/// # Errors
///
/// Returns [`DistractorError::MissingPattern`] or
/// [`DistractorError::NoMatches`] when a file-based source has nothing to
/// load, and any error raised while decoding the files.
pub fn build_source(
    kind: DistractorKind,
    shape: (usize, usize),
    pattern: Option<&str>,
    total_frames: Option<usize>,
    seed: u64,
) -> Result<Box<dyn BackgroundSource>> {
    if shape.0 == 0 || shape.1 == 0 {
        return Err(DistractorError::EmptyShape(shape.0, shape.1));
    }
    let source: Box<dyn BackgroundSource> = match kind {
        DistractorKind::Color => Box::new(RandomColorSource::new(shape, seed)),
        DistractorKind::Noise => Box::new(NoiseSource::new(shape, seed)),
        DistractorKind::Images | DistractorKind::Video => {
            let pattern = pattern.ok_or(DistractorError::MissingPattern(kind))?;
            let files = expand_pattern(pattern)?;
            if files.is_empty() {
                return Err(DistractorError::NoMatches(pattern.to_string()));
            }
            if kind == DistractorKind::Images {
                Box::new(RandomImageSource::new(shape, files, true, total_frames, seed)?)
            } else {
                Box::new(RandomVideoSource::new(shape, files, true, total_frames, seed)?)
            }
        }
    };
    tracing::info!(%kind, height = shape.0, width = shape.1, "Distractor source ready");
    Ok(source)
}
