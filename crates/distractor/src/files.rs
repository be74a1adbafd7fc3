//! File discovery and decoding for image and video distractors.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, DynamicImage};
use ndarray::Array3;

use crate::background::Background;
use crate::{DistractorError, Result};

/// Expand a leading `~` and glob `pattern`; matches are sorted.
///
/// # Errors
///
/// Returns [`DistractorError::InvalidPattern`] for malformed patterns.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let expanded = expand_home(pattern);
    let mut files: Vec<PathBuf> = glob::glob(&expanded)?.filter_map(std::result::Result::ok).collect();
    files.sort();
    Ok(files)
}

fn expand_home(pattern: &str) -> String {
    let rest = match pattern.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return pattern.to_string(),
    };
    match std::env::var("HOME") {
        Ok(home) => format!("{home}{rest}"),
        Err(_) => pattern.to_string(),
    }
}

/// Resize and convert a decoded frame to a background.
///
/// # Errors
///
/// Returns [`DistractorError::Shape`] if the resized buffer does not fill
/// `shape`.
pub(crate) fn to_background(image: &DynamicImage, shape: (usize, usize), grayscale: bool) -> Result<Background> {
    let (h, w) = (shape.0 as u32, shape.1 as u32);
    let (channels, raw) = if grayscale {
        (1, imageops::resize(&image.to_luma8(), w, h, FilterType::Triangle).into_raw())
    } else {
        (3, imageops::resize(&image.to_rgb8(), w, h, FilterType::Triangle).into_raw())
    };
    let data = Array3::from_shape_vec((shape.0, shape.1, channels), raw)?;
    Ok(Background::from_array(data))
}

/// Decode a still image.
pub(crate) fn load_image(path: &Path, shape: (usize, usize), grayscale: bool) -> Result<Background> {
    let image = image::open(path).map_err(|source| DistractorError::Image { path: path.to_path_buf(), source })?;
    to_background(&image, shape, grayscale)
}

/// Decode every frame of a clip.
///
/// Animated GIFs yield all their frames; any other image format is a
/// single-frame clip.
pub(crate) fn load_clip(path: &Path, shape: (usize, usize), grayscale: bool) -> Result<Vec<Background>> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if !is_gif {
        return Ok(vec![load_image(path, shape, grayscale)?]);
    }
    let file = File::open(path).map_err(|source| DistractorError::Io { path: path.to_path_buf(), source })?;
    let image_err = |source| DistractorError::Image { path: path.to_path_buf(), source };
    let frames = GifDecoder::new(BufReader::new(file))
        .map_err(image_err)?
        .into_frames()
        .collect_frames()
        .map_err(image_err)?;
    tracing::debug!(path = %path.display(), frames = frames.len(), "Decoded clip");
    frames
        .into_iter()
        .map(|frame| to_background(&DynamicImage::ImageRgba8(frame.into_buffer()), shape, grayscale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_patterns_are_untouched() {
        assert_eq!(expand_home("/data/*.png"), "/data/*.png");
        assert_eq!(expand_home("~user/x"), "~user/x");
    }

    #[test]
    fn grayscale_frames_have_one_channel() {
        let image = DynamicImage::new_rgb8(10, 20);
        let bg = to_background(&image, (4, 6), true).unwrap();
        assert_eq!((bg.height(), bg.width(), bg.channels()), (4, 6, 1));
    }

    #[test]
    fn color_frames_keep_pixel_values() {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(9, 5, image::Rgb([30, 90, 150])));
        let bg = to_background(&image, (3, 7), false).unwrap();
        assert_eq!((bg.height(), bg.width(), bg.channels()), (3, 7, 3));
        assert_eq!(bg.pixel(2, 6), [30, 90, 150]);
    }
}
