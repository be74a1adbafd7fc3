//! Conversions between control-suite data and gym-style observations.

use distractor::Background;
use image::{Rgb, RgbImage};
use ndarray::Array3;
use spaces::{BoxSpace, Dtype};
use suite::{Observation, Spec};

use crate::{AdapterError, Result};

/// Concatenate specs into one flat float box.
///
/// Unbounded specs contribute `(-inf, inf)`; bounded specs contribute their
/// minimum and maximum broadcast over every element.
///
/// # Errors
///
/// Returns [`AdapterError::NonFloatSpec`] for integer or byte specs.
pub fn spec_to_box<'a>(specs: impl IntoIterator<Item = &'a Spec>) -> Result<BoxSpace> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    for spec in specs {
        if !spec.dtype().is_float() {
            return Err(AdapterError::NonFloatSpec { name: spec.name().to_string(), dtype: spec.dtype() });
        }
        let n = spec.num_values();
        match spec {
            Spec::Array(_) => {
                low.extend(std::iter::repeat(f32::NEG_INFINITY).take(n));
                high.extend(std::iter::repeat(f32::INFINITY).take(n));
            }
            Spec::Bounded(bounded) => {
                low.extend(bounded.minimum.broadcast(n)?.into_iter().map(|v| v as f32));
                high.extend(bounded.maximum.broadcast(n)?.into_iter().map(|v| v as f32));
            }
        }
    }
    let len = low.len();
    Ok(BoxSpace::new(low, high, vec![len], Dtype::F32)?)
}

/// Ravel every observation entry and concatenate them in order.
#[must_use]
pub fn flatten_observation(observation: &Observation) -> Vec<f32> {
    observation
        .values()
        .flat_map(suite::ObsValue::to_flat)
        .map(|v| v as f32)
        .collect()
}

/// Sky pixels: blue strictly brighter than both red and green.
#[must_use]
pub fn is_background(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    b > g && b > r
}

/// Replace every sky pixel of `frame` with the matching background pixel.
/// Returns the number of pixels replaced.
///
/// # Errors
///
/// Returns [`AdapterError::BackgroundShape`] if the sizes differ.
pub fn apply_background(frame: &mut RgbImage, background: &Background) -> Result<usize> {
    let (width, height) = frame.dimensions();
    if background.height() != height as usize || background.width() != width as usize {
        return Err(AdapterError::BackgroundShape {
            height,
            width,
            bg_height: background.height(),
            bg_width: background.width(),
        });
    }
    let mut replaced = 0;
    for (x, y, pixel) in frame.enumerate_pixels_mut() {
        if is_background(pixel) {
            *pixel = Rgb(background.pixel(y as usize, x as usize));
            replaced += 1;
        }
    }
    Ok(replaced)
}

/// `H x W x 3` image to `3 x H x W` array.
#[must_use]
pub fn to_chw(frame: &RgbImage) -> Array3<u8> {
    let (width, height) = frame.dimensions();
    Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
        frame.get_pixel(x as u32, y as u32).0[c]
    })
}

/// `3 x H x W` array back to an `H x W x 3` image.
#[must_use]
pub fn to_hwc(pixels: &Array3<u8>) -> RgbImage {
    let (_, height, width) = pixels.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([pixels[[0, y, x]], pixels[[1, y, x]], pixels[[2, y, x]]])
    })
}
