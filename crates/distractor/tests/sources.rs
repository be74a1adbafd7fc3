use std::fs::File;
use std::path::{Path, PathBuf};

use distractor::{
    build_source, expand_pattern, Background, BackgroundSource, DistractorError, DistractorKind,
    NoiseSource, RandomColorSource, RandomImageSource, RandomVideoSource,
};
use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, GrayImage, Luma, Rgba, RgbaImage};

const SHAPE: (usize, usize) = (6, 8);

fn write_gray_png(dir: &Path, name: &str, value: u8) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(16, 12, Luma([value])).save(&path).unwrap();
    path
}

/// Writes a clip whose frame `i` is uniformly `values[i]`.
fn write_gif(dir: &Path, name: &str, values: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GifEncoder::new(File::create(&path).unwrap());
    let frames = values.iter().map(|&v| {
        Frame::from_parts(
            RgbaImage::from_pixel(16, 12, Rgba([v, v, v, 255])),
            0,
            0,
            Delay::from_numer_denom_ms(40, 1),
        )
    });
    encoder.encode_frames(frames).unwrap();
    path
}

fn gray_level(source: &mut dyn BackgroundSource) -> u8 {
    source.get_image().pixel(3, 4)[0]
}

#[test]
fn kinds_parse_and_unknown_kinds_fail() {
    assert_eq!("color".parse::<DistractorKind>().unwrap(), DistractorKind::Color);
    assert_eq!("video".parse::<DistractorKind>().unwrap(), DistractorKind::Video);
    assert!(matches!(
        "pixels".parse::<DistractorKind>(),
        Err(DistractorError::UnknownKind(k)) if k == "pixels"
    ));
    assert_eq!(DistractorKind::Images.to_string(), "images");
}

#[test]
fn color_is_constant_within_an_episode() {
    let mut source = RandomColorSource::new(SHAPE, 4);
    let color = source.color();
    let bg = source.get_image().clone();
    assert_eq!(bg.channels(), 3);
    assert_eq!(bg.pixel(0, 0), color);
    assert_eq!(bg.pixel(5, 7), color);
    assert_eq!(source.get_image(), &bg);
}

#[test]
fn color_sequence_is_seeded() {
    let mut a = RandomColorSource::new(SHAPE, 9);
    let mut b = RandomColorSource::new(SHAPE, 9);
    for _ in 0..5 {
        assert_eq!(a.color(), b.color());
        a.reset();
        b.reset();
    }
}

#[test]
fn noise_changes_every_frame() {
    let mut source = NoiseSource::new((16, 16), 0);
    let first = source.get_image().clone();
    let second = source.get_image().clone();
    assert_ne!(first, second);
    assert!(first.as_array().iter().any(|&v| v > 0));
}

#[test]
fn noise_sequence_is_seeded() {
    let mut a = NoiseSource::new(SHAPE, 13);
    let mut b = NoiseSource::new(SHAPE, 13);
    let mut c = NoiseSource::new(SHAPE, 14);
    for _ in 0..4 {
        let frame = a.get_image().clone();
        assert_eq!(&frame, b.get_image());
        assert_ne!(&frame, c.get_image());
    }
}

#[test]
fn noise_strength_scales_and_clamps() {
    let mut silent = NoiseSource::with_strength((16, 16), 0.0, 2);
    assert!(silent.get_image().as_array().iter().all(|&v| v == 0));

    // A unit normal almost never exceeds 6.
    let mut faint = NoiseSource::with_strength((16, 16), 1.0, 2);
    assert!(faint.get_image().as_array().iter().all(|&v| v <= 6));

    // Huge strength saturates: negatives clamp to 0, positives to 255.
    let mut loud = NoiseSource::with_strength((16, 16), 1e9, 2);
    let values = loud.get_image().as_array().clone();
    assert!(values.iter().all(|&v| v == 0 || v == 255));
    assert!(values.iter().any(|&v| v == 0));
    assert!(values.iter().any(|&v| v == 255));
}

#[test]
fn images_are_resized_grayscale_and_static_until_reset() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_gray_png(dir.path(), "a.png", 10),
        write_gray_png(dir.path(), "b.png", 200),
    ];
    let mut source = RandomImageSource::new(SHAPE, files, true, None, 1).unwrap();
    assert_eq!(source.total_frames(), 2);

    let bg = source.get_image().clone();
    assert_eq!((bg.height(), bg.width(), bg.channels()), (6, 8, 1));
    let level = bg.pixel(0, 0)[0];
    assert!(level == 10 || level == 200);
    assert_eq!(bg.pixel(2, 2), [level, level, level]);
    assert_eq!(gray_level(&mut source), level);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..32 {
        source.reset();
        seen.insert(gray_level(&mut source));
    }
    assert_eq!(seen.len(), 2);
}

fn pool_levels(frames: &[Background]) -> Vec<u8> {
    frames.iter().map(|bg| bg.pixel(0, 0)[0]).collect()
}

#[test]
fn image_pool_cycles_files_up_to_total_frames() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_gray_png(dir.path(), "a.png", 50),
        write_gray_png(dir.path(), "b.png", 150),
    ];
    let source = RandomImageSource::new(SHAPE, files, true, Some(5), 0).unwrap();
    assert_eq!(source.total_frames(), 5);
    assert_eq!(pool_levels(source.frames()), [50, 150, 50, 150, 50]);
}

#[test]
fn zero_total_frames_means_one_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_gray_png(dir.path(), "a.png", 50),
        write_gray_png(dir.path(), "b.png", 150),
    ];
    let images = RandomImageSource::new(SHAPE, files, true, Some(0), 0).unwrap();
    assert_eq!(pool_levels(images.frames()), [50, 150]);

    let clips = vec![
        write_gif(dir.path(), "a.gif", &[10, 20]),
        write_gif(dir.path(), "b.gif", &[30, 40, 50]),
    ];
    let video = RandomVideoSource::new(SHAPE, clips, true, Some(0), 0).unwrap();
    assert_eq!(video.total_frames(), 5);
}

#[test]
fn image_draws_are_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = (0..4u8)
        .map(|i| write_gray_png(dir.path(), &format!("{i}.png"), 40 * i + 10))
        .collect();
    let mut a = RandomImageSource::new(SHAPE, files.clone(), true, None, 21).unwrap();
    let mut b = RandomImageSource::new(SHAPE, files, true, None, 21).unwrap();
    for _ in 0..10 {
        assert_eq!(gray_level(&mut a), gray_level(&mut b));
        a.reset();
        b.reset();
    }
}

#[test]
fn video_pool_and_playback_are_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let clips = [&[10u8, 20][..], &[30, 40, 50], &[60, 70, 80, 90]];
    let files: Vec<PathBuf> = clips
        .iter()
        .enumerate()
        .map(|(i, levels)| write_gif(dir.path(), &format!("{i}.gif"), levels))
        .collect();

    let mut a = RandomVideoSource::new(SHAPE, files.clone(), true, None, 5).unwrap();
    let mut b = RandomVideoSource::new(SHAPE, files.clone(), true, None, 5).unwrap();
    let pool = pool_levels(a.frames());
    assert_eq!(pool, pool_levels(b.frames()));

    // Whole clips are concatenated in a shuffled clip order.
    let mut rest = &pool[..];
    let mut used = Vec::new();
    while !rest.is_empty() {
        let clip = clips.iter().position(|c| rest.starts_with(c)).unwrap();
        used.push(clip);
        rest = &rest[clips[clip].len()..];
    }
    used.sort_unstable();
    assert_eq!(used, [0, 1, 2]);

    for _ in 0..3 {
        for _ in 0..12 {
            assert_eq!(gray_level(&mut a), gray_level(&mut b));
        }
        a.reset();
        b.reset();
    }

    let filled_a = RandomVideoSource::new(SHAPE, files.clone(), true, Some(20), 8).unwrap();
    let filled_b = RandomVideoSource::new(SHAPE, files, true, Some(20), 8).unwrap();
    assert_eq!(pool_levels(filled_a.frames()), pool_levels(filled_b.frames()));
}

#[test]
fn video_plays_consecutive_frames_and_wraps() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write_gif(dir.path(), "clip.gif", &[0, 60, 120, 180])];
    let mut source = RandomVideoSource::new(SHAPE, files, true, None, 3).unwrap();
    assert_eq!(source.total_frames(), 4);

    let levels: Vec<u8> = (0..8).map(|_| gray_level(&mut source)).collect();
    let start = [0u8, 60, 120, 180].iter().position(|&v| v == levels[0]).unwrap();
    for (i, level) in levels.iter().enumerate() {
        assert_eq!(*level, [0u8, 60, 120, 180][(start + i) % 4]);
    }
}

#[test]
fn video_total_frames_truncates_and_repeats_clips() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_gif(dir.path(), "a.gif", &[10, 20]),
        write_gif(dir.path(), "b.gif", &[30, 40, 50]),
    ];
    let short = RandomVideoSource::new(SHAPE, files.clone(), true, Some(4), 0).unwrap();
    assert_eq!(short.total_frames(), 4);
    let long = RandomVideoSource::new(SHAPE, files, true, Some(12), 0).unwrap();
    assert_eq!(long.total_frames(), 12);
}

#[test]
fn still_images_count_as_single_frame_clips() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write_gray_png(dir.path(), "still.png", 90)];
    let mut source = RandomVideoSource::new(SHAPE, files, true, None, 0).unwrap();
    assert_eq!(source.total_frames(), 1);
    assert_eq!(gray_level(&mut source), 90);
}

#[test]
fn build_source_requires_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.png", dir.path().display());
    assert!(matches!(
        build_source(DistractorKind::Images, SHAPE, Some(&pattern), None, 0),
        Err(DistractorError::NoMatches(p)) if p == pattern
    ));
    assert!(matches!(
        build_source(DistractorKind::Video, SHAPE, None, None, 0),
        Err(DistractorError::MissingPattern(DistractorKind::Video))
    ));

    write_gray_png(dir.path(), "x.png", 1);
    write_gray_png(dir.path(), "y.png", 2);
    assert_eq!(expand_pattern(&pattern).unwrap().len(), 2);
    let mut source = build_source(DistractorKind::Images, SHAPE, Some(&pattern), None, 0).unwrap();
    assert!(source.get_image().is_grayscale());
}

#[test]
fn color_and_noise_need_no_files() {
    let mut color = build_source(DistractorKind::Color, SHAPE, None, None, 0).unwrap();
    assert_eq!(color.get_image().channels(), 3);
    let mut noise = build_source(DistractorKind::Noise, SHAPE, Some("ignored"), None, 0).unwrap();
    assert_eq!(noise.get_image().height(), 6);
}
