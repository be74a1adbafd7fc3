use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::background::{Background, BackgroundSource};
use crate::files::load_clip;
use crate::{DistractorError, Result};

/// Consecutive video frames; each episode starts at a random frame and
/// plays forward, wrapping around the end of the pool.
pub struct RandomVideoSource {
    frames: Vec<Background>,
    loc: usize,
    rng: StdRng,
}

impl RandomVideoSource {
    /// Preload frames from the clips in `files`.
    ///
    /// Without `total_frames` (or with `Some(0)`), every frame of every clip
    /// is loaded in a shuffled clip order. Otherwise clips are read in
    /// shuffled passes until exactly `total_frames` frames are loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DistractorError::NoFrames`] if the clips contain no frames,
    /// and any decoding error.
    pub fn new(
        shape: (usize, usize),
        mut files: Vec<PathBuf>,
        grayscale: bool,
        total_frames: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        if files.is_empty() {
            return Err(DistractorError::NoFrames);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let frames = match total_frames.filter(|&n| n > 0) {
            None => {
                files.shuffle(&mut rng);
                let mut frames = Vec::new();
                for file in &files {
                    frames.extend(load_clip(file, shape, grayscale)?);
                }
                frames
            }
            Some(total) => fill_frames(&mut files, shape, grayscale, total, &mut rng)?,
        };
        if frames.is_empty() {
            return Err(DistractorError::NoFrames);
        }
        tracing::info!(frames = frames.len(), clips = files.len(), "Loaded video distractors");

        let mut source = Self { frames, loc: 0, rng };
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

fn fill_frames(
    files: &mut [PathBuf],
    shape: (usize, usize),
    grayscale: bool,
    total: usize,
    rng: &mut StdRng,
) -> Result<Vec<Background>> {
    let mut frames = Vec::with_capacity(total);
    let mut file_i = 0;
    let mut loaded_this_pass = 0;
    while frames.len() < total {
        if file_i % files.len() == 0 {
            // A whole pass without a single frame would loop forever.
            if file_i > 0 && loaded_this_pass == 0 {
                return Err(DistractorError::NoFrames);
            }
            loaded_this_pass = 0;
            files.shuffle(rng);
        }
        let clip = load_clip(&files[file_i % files.len()], shape, grayscale)?;
        file_i += 1;
        loaded_this_pass += clip.len();
        let room = total - frames.len();
        frames.extend(clip.into_iter().take(room));
    }
    Ok(frames)
}

impl BackgroundSource for RandomVideoSource {
    fn get_image(&mut self) -> &Background {
        let idx = self.loc % self.frames.len();
        self.loc = self.loc.wrapping_add(1);
        &self.frames[idx]
    }

    fn reset(&mut self) {
        self.loc = self.rng.gen_range(0..self.frames.len());
    }
}
