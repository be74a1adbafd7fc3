use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::background::{Background, BackgroundSource};

/// Per-frame Gaussian noise.
///
/// Each channel is `N(0, 1) * strength`, clamped into the byte range, so
/// roughly half the pixels of each channel are black.
pub struct NoiseSource {
    background: Background,
    strength: f32,
    rng: StdRng,
}

impl NoiseSource {
    #[must_use]
    pub fn new(shape: (usize, usize), seed: u64) -> Self {
        Self::with_strength(shape, 255.0, seed)
    }

    #[must_use]
    pub fn with_strength(shape: (usize, usize), strength: f32, seed: u64) -> Self {
        Self {
            background: Background::zeros(shape.0, shape.1, 3),
            strength,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl BackgroundSource for NoiseSource {
    fn get_image(&mut self) -> &Background {
        let strength = self.strength;
        let rng = &mut self.rng;
        for v in self.background.as_array_mut().iter_mut() {
            let sample: f32 = StandardNormal.sample(&mut *rng);
            *v = (sample * strength).clamp(0.0, 255.0) as u8;
        }
        &self.background
    }

    fn reset(&mut self) {}
}
