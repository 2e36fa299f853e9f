use super::*;

#[test]
fn native_rate_maps_identity() {
    let t = FrameTiming::new(60, 60.0, 0.0).unwrap();
    assert_eq!(t.output_frames(), 60);
    assert_eq!(t.effective_fps(), 60.0);
    for j in 0..60 {
        assert_eq!(t.native_index(j), j);
    }
}

#[test]
fn halving_fps_skips_every_other_frame() {
    let t = FrameTiming::new(60, 60.0, 30.0).unwrap();
    assert_eq!(t.output_frames(), 30);
    for j in 0..30 {
        assert_eq!(t.native_index(j), 2 * j);
    }
}

#[test]
fn doubling_fps_repeats_native_frames() {
    let t = FrameTiming::new(30, 30.0, 60.0).unwrap();
    assert_eq!(t.output_frames(), 60);
    for j in 0..60 {
        assert_eq!(t.native_index(j), (j as f64 / 2.0).round() as u64);
    }
    // Nearest-frame sampling produces duplicates.
    assert_eq!(t.native_index(1), t.native_index(2));
}

#[test]
fn fractional_rates_keep_duration() {
    let t = FrameTiming::new(90, 29.97, 24.0).unwrap();
    assert!((t.duration_secs() - 90.0 / 29.97).abs() < 1e-9);
    assert_eq!(t.output_frames(), (24.0 * 90.0 / 29.97_f64).round() as u64);
}

#[test]
fn zero_frames_or_fps_is_invalid_animation() {
    assert!(matches!(
        FrameTiming::new(0, 60.0, 0.0),
        Err(ExportError::InvalidAnimation(_))
    ));
    assert!(matches!(
        FrameTiming::new(60, 0.0, 0.0),
        Err(ExportError::InvalidAnimation(_))
    ));
    assert!(matches!(
        FrameTiming::new(60, f64::NAN, 0.0),
        Err(ExportError::InvalidAnimation(_))
    ));
}

#[test]
fn bad_target_fps_is_rejected() {
    assert!(matches!(
        FrameTiming::new(60, 60.0, -1.0),
        Err(ExportError::Validation(_))
    ));
    assert!(matches!(
        FrameTiming::new(60, 60.0, f64::INFINITY),
        Err(ExportError::Validation(_))
    ));
    // One native frame at 60fps exported at 1fps rounds to zero output frames.
    assert!(matches!(
        FrameTiming::new(1, 60.0, 1.0),
        Err(ExportError::Validation(_))
    ));
}
