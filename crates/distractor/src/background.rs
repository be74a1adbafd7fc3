//! Background frames and the source trait.

use ndarray::Array3;

/// A `(height, width, channels)` byte image with 1 or 3 channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    data: Array3<u8>,
}

impl Background {
    /// Black background.
    #[must_use]
    pub fn zeros(height: usize, width: usize, channels: usize) -> Self {
        Self { data: Array3::zeros((height, width, channels)) }
    }

    /// Wrap an array with 1 or 3 channels.
    pub(crate) fn from_array(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim().2, 1 | 3));
        Self { data }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    #[must_use]
    pub fn is_grayscale(&self) -> bool {
        self.channels() == 1
    }

    /// RGB value at `(y, x)`; grayscale is replicated across channels.
    #[must_use]
    pub fn pixel(&self, y: usize, x: usize) -> [u8; 3] {
        if self.is_grayscale() {
            let v = self.data[[y, x, 0]];
            [v, v, v]
        } else {
            [self.data[[y, x, 0]], self.data[[y, x, 1]], self.data[[y, x, 2]]]
        }
    }

    #[must_use]
    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }
}

/// Produces backgrounds for consecutive observations.
pub trait BackgroundSource: Send {
    /// Background for the next observation.
    fn get_image(&mut self) -> &Background;

    /// Start a new episode.
    fn reset(&mut self);
}
