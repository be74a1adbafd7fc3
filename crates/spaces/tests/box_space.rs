use spaces::{BoxSpace, Dtype, SpaceError};

#[test]
fn rejects_bounds_that_do_not_cover_shape() {
    let err = BoxSpace::new(vec![0.0; 3], vec![1.0; 3], vec![2, 2], Dtype::F32).unwrap_err();
    assert_eq!(
        err,
        SpaceError::ShapeMismatch { shape: vec![2, 2], expected: 4, bounds: 3 }
    );
}

#[test]
fn rejects_inverted_bounds() {
    let err = BoxSpace::new(vec![0.0, 2.0], vec![1.0, 1.0], vec![2], Dtype::F32).unwrap_err();
    assert!(matches!(err, SpaceError::InvertedBounds { index: 1, .. }));
}

#[test]
fn contains_checks_length_and_bounds() {
    let space = BoxSpace::uniform(&[2], -1.0, 1.0, Dtype::F32).unwrap();
    assert!(space.contains(&[-1.0, 1.0]));
    assert!(space.contains(&[0.0, 0.25]));
    assert!(!space.contains(&[0.0, 1.01]));
    assert!(!space.contains(&[0.0]));
    assert!(!space.contains(&[f32::NAN, 0.0]));
}

#[test]
fn byte_space_requires_integral_values() {
    let space = BoxSpace::uniform(&[3, 2, 2], 0.0, 255.0, Dtype::U8).unwrap();
    assert_eq!(space.len(), 12);
    assert!(space.contains(&[255.0; 12]));
    assert!(!space.contains(&[0.5; 12]));
}

#[test]
fn seeded_sampling_is_reproducible() {
    let mut a = BoxSpace::uniform(&[4], -2.0, 3.0, Dtype::F32).unwrap();
    let mut b = a.clone();
    a.seed(7);
    b.seed(7);
    for _ in 0..10 {
        let (sa, sb) = (a.sample(), b.sample());
        assert_eq!(sa, sb);
        assert!(a.contains(&sa));
    }
}

#[test]
fn byte_samples_stay_in_range() {
    let mut space = BoxSpace::uniform(&[16], 0.0, 255.0, Dtype::U8).unwrap();
    space.seed(1);
    for _ in 0..50 {
        let s = space.sample();
        assert!(space.contains(&s));
    }
}

#[test]
fn unbounded_space_reports_infinite_bounds() {
    let mut space = BoxSpace::unbounded(&[5]);
    assert!(!space.is_bounded());
    assert_eq!(space.low(), &[f32::NEG_INFINITY; 5]);
    space.seed(0);
    assert!(space.sample().iter().all(|v| v.is_finite()));
}

#[test]
fn equality_ignores_rng_state() {
    let mut a = BoxSpace::uniform(&[2], 0.0, 1.0, Dtype::F32).unwrap();
    let b = BoxSpace::uniform(&[2], 0.0, 1.0, Dtype::F32).unwrap();
    a.seed(99);
    assert_eq!(a, b);
}

#[test]
fn full_range_float_space_samples_without_overflow() {
    let mut space = BoxSpace::uniform(&[8], -f32::MAX, f32::MAX, Dtype::F32).unwrap();
    space.seed(0);
    for _ in 0..20 {
        let s = space.sample();
        assert!(s.iter().all(|v| v.is_finite()));
        assert!(space.contains(&s));
    }

    let mut wide = BoxSpace::new(vec![-f32::MAX, 0.0], vec![f32::MAX, 1.0], vec![2], Dtype::F32).unwrap();
    wide.seed(4);
    let s = wide.sample();
    assert!(wide.contains(&s));
    assert!((0.0..1.0).contains(&s[1]));
}
