use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::background::{Background, BackgroundSource};

/// Solid colour, redrawn on every reset.
pub struct RandomColorSource {
    background: Background,
    color: [u8; 3],
    rng: StdRng,
}

impl RandomColorSource {
    #[must_use]
    pub fn new(shape: (usize, usize), seed: u64) -> Self {
        let mut source = Self {
            background: Background::zeros(shape.0, shape.1, 3),
            color: [0; 3],
            rng: StdRng::seed_from_u64(seed),
        };
        source.reset();
        source
    }

    /// Colour of the current episode.
    #[must_use]
    pub fn color(&self) -> [u8; 3] {
        self.color
    }
}

impl BackgroundSource for RandomColorSource {
    fn get_image(&mut self) -> &Background {
        &self.background
    }

    fn reset(&mut self) {
        self.color = self.rng.gen();
        let color = self.color;
        for ((_, _, c), v) in self.background.as_array_mut().indexed_iter_mut() {
            *v = color[c];
        }
    }
}
