#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss, clippy::float_cmp)]
//! # Spaces
//!
//! Gym-style space descriptions for actions, observations and internal state.
//!
//! Only the continuous [`BoxSpace`] is needed by the adapter: a flat list of
//! per-element bounds with a logical `shape` and an element [`Dtype`]. Each
//! space owns a private RNG so that sampling is reproducible once [`seed`] has
//! been called.
//!
//! [`seed`]: BoxSpace::seed

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, StandardNormal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SpaceError {
    #[error("bounds length {bounds} does not match shape {shape:?} ({expected} elements)")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        bounds: usize,
    },
    #[error("lower bound {low} exceeds upper bound {high} at element {index}")]
    InvertedBounds { index: usize, low: f32, high: f32 },
}

pub type Result<T> = std::result::Result<T, SpaceError>;

/// Element type carried by a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    F32,
    U8,
}

/// Continuous box `[low, high]` over a fixed shape.
#[derive(Debug, Clone)]
pub struct BoxSpace {
    shape: Vec<usize>,
    low: Vec<f32>,
    high: Vec<f32>,
    dtype: Dtype,
    rng: StdRng,
}

impl BoxSpace {
    /// Create a space from flat per-element bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::ShapeMismatch`] if the bounds do not cover
    /// `shape` exactly, or [`SpaceError::InvertedBounds`] if any `low > high`.
    pub fn new(low: Vec<f32>, high: Vec<f32>, shape: Vec<usize>, dtype: Dtype) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        for bounds in [low.len(), high.len()] {
            if bounds != expected {
                return Err(SpaceError::ShapeMismatch { shape, expected, bounds });
            }
        }
        if let Some(index) = low.iter().zip(&high).position(|(l, h)| l > h) {
            return Err(SpaceError::InvertedBounds { index, low: low[index], high: high[index] });
        }
        Ok(Self { shape, low, high, dtype, rng: StdRng::from_entropy() })
    }

    /// Create a space where every element shares the same bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::InvertedBounds`] if `low > high`.
    pub fn uniform(shape: &[usize], low: f32, high: f32, dtype: Dtype) -> Result<Self> {
        let n = shape.iter().product::<usize>();
        Self::new(vec![low; n], vec![high; n], shape.to_vec(), dtype)
    }

    /// Create a `(-inf, inf)` float space.
    #[must_use]
    pub fn unbounded(shape: &[usize]) -> Self {
        let n = shape.iter().product::<usize>();
        Self {
            shape: shape.to_vec(),
            low: vec![f32::NEG_INFINITY; n],
            high: vec![f32::INFINITY; n],
            dtype: Dtype::F32,
            rng: StdRng::from_entropy(),
        }
    }

    /// Logical shape; bounds are stored flat in row-major order.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-element lower bounds.
    #[must_use]
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    /// Per-element upper bounds.
    #[must_use]
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    #[must_use]
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    /// Number of scalar elements in the space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Whether every bound is finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.low.iter().chain(&self.high).all(|v| v.is_finite())
    }

    /// Reseed the sampling RNG.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Check membership of a flat value.
    ///
    /// NaN is never contained. Integer spaces additionally require integral
    /// values.
    #[must_use]
    pub fn contains(&self, value: &[f32]) -> bool {
        if value.len() != self.len() {
            return false;
        }
        let integral = self.dtype == Dtype::U8;
        value
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .all(|(&v, (&l, &h))| v >= l && v <= h && (!integral || v.fract() == 0.0))
    }

    /// Draw a random element of the space.
    ///
    /// Bounded dimensions are uniform, half-bounded dimensions are an
    /// exponential offset from the finite bound, and unbounded dimensions are
    /// standard normal.
    pub fn sample(&mut self) -> Vec<f32> {
        let integral = self.dtype == Dtype::U8;
        let rng = &mut self.rng;
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&l, &h)| {
                let v = match (l.is_finite(), h.is_finite()) {
                    (true, true) => {
                        let upper = if integral { h + 1.0 } else { h };
                        if upper <= l {
                            l
                        } else if (upper - l).is_finite() {
                            rng.gen_range(l..upper)
                        } else {
                            // Width overflows f32; interpolate between the bounds instead.
                            let u: f32 = rng.gen();
                            (l * (1.0 - u) + upper * u).clamp(l, h)
                        }
                    }
                    (true, false) => {
                        let offset: f32 = Exp1.sample(&mut *rng);
                        l + offset
                    }
                    (false, true) => {
                        let offset: f32 = Exp1.sample(&mut *rng);
                        h - offset
                    }
                    (false, false) => StandardNormal.sample(&mut *rng),
                };
                if integral {
                    v.floor().clamp(l, h)
                } else {
                    v
                }
            })
            .collect()
    }
}

impl PartialEq for BoxSpace {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.dtype == other.dtype
            && self.low == other.low
            && self.high == other.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_bounded_samples_respect_finite_side() {
        let mut space =
            BoxSpace::new(vec![0.0, f32::NEG_INFINITY], vec![f32::INFINITY, 1.0], vec![2], Dtype::F32)
                .unwrap();
        space.seed(3);
        for _ in 0..200 {
            let s = space.sample();
            assert!(s[0] >= 0.0);
            assert!(s[1] <= 1.0);
        }
    }

    #[test]
    fn degenerate_bounds_sample_the_point() {
        let mut space = BoxSpace::uniform(&[3], 0.5, 0.5, Dtype::F32).unwrap();
        assert_eq!(space.sample(), vec![0.5; 3]);
    }
}
