use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::background::{Background, BackgroundSource};
use crate::files::load_image;
use crate::{DistractorError, Result};

/// Still images, one drawn at random per episode.
pub struct RandomImageSource {
    frames: Vec<Background>,
    loc: usize,
    rng: StdRng,
}

impl RandomImageSource {
    /// Preload `total_frames` images (default: one per file), cycling
    /// through `files` in order. `Some(0)` means the default.
    ///
    /// # Errors
    ///
    /// Returns [`DistractorError::NoFrames`] if nothing would be loaded and
    /// any decoding error.
    pub fn new(
        shape: (usize, usize),
        files: Vec<PathBuf>,
        grayscale: bool,
        total_frames: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        let total = total_frames.filter(|&n| n > 0).unwrap_or(files.len());
        if files.is_empty() || total == 0 {
            return Err(DistractorError::NoFrames);
        }
        let frames = (0..total)
            .map(|i| load_image(&files[i % files.len()], shape, grayscale))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(frames = frames.len(), files = files.len(), "Loaded image distractors");

        let mut source = Self { frames, loc: 0, rng: StdRng::seed_from_u64(seed) };
        source.reset();
        Ok(source)
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// The preloaded pool, in load order.
    #[must_use]
    pub fn frames(&self) -> &[Background] {
        &self.frames
    }
}

impl BackgroundSource for RandomImageSource {
    fn get_image(&mut self) -> &Background {
        &self.frames[self.loc]
    }

    fn reset(&mut self) {
        self.loc = self.rng.gen_range(0..self.frames.len());
    }
}
