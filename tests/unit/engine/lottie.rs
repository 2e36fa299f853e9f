use super::*;

const DOC: &str = r##"{
  "fr": 24, "ip": 0, "op": 48, "w": 8, "h": 8,
  "layers": [ { "ty": 1, "sc": "#ff0000", "sw": 8, "sh": 8, "ks": {} } ]
}"##;

fn source() -> AnimationSource {
    AnimationSource::from(DOC)
}

#[test]
fn contexts_with_same_key_share_one_parse() {
    let engine = LottieEngine::new();
    let key = ExportKey::issue();
    let a = engine.load(&source(), key).unwrap();
    let b = engine.load(&source(), key).unwrap();
    assert_eq!(engine.cached_len(), 1);
    assert!(Arc::ptr_eq(&a.comp, &b.comp));

    engine.load(&source(), ExportKey::issue()).unwrap();
    assert_eq!(engine.cached_len(), 2);

    engine.release(key);
    assert_eq!(engine.cached_len(), 1);
}

#[test]
fn info_reports_native_timeline() {
    let ctx = LottieEngine::new()
        .load(&source(), ExportKey::issue())
        .unwrap();
    let info = ctx.info();
    assert_eq!(info.total_frames, 48);
    assert_eq!(info.frame_rate, 24.0);
}

#[test]
fn malformed_source_fails_to_load() {
    let engine = LottieEngine::new();
    let key = ExportKey::issue();
    assert!(engine.load(&AnimationSource::from("{"), key).is_err());
    assert_eq!(engine.cached_len(), 0);
}

#[test]
fn renders_straight_alpha_into_buffer() {
    let mut ctx = LottieEngine::new()
        .load(&source(), ExportKey::issue())
        .unwrap();
    let canvas = crate::Canvas::new(16, 16).unwrap();
    let mut buf = PixelBuffer::new(canvas);
    ctx.render(0, &mut buf).unwrap();
    assert_eq!(buf.pixel(3, 12), [255, 0, 0, 255]);

    // Past-the-end frames clamp to the last frame instead of failing.
    ctx.render(1000, &mut buf).unwrap();
    assert_eq!(buf.pixel(3, 12), [255, 0, 0, 255]);
}

#[test]
fn pixmap_follows_buffer_size() {
    let mut ctx = LottieEngine::new()
        .load(&source(), ExportKey::issue())
        .unwrap();
    let mut small = PixelBuffer::new(crate::Canvas::new(4, 4).unwrap());
    let mut large = PixelBuffer::new(crate::Canvas::new(32, 8).unwrap());
    ctx.render(0, &mut small).unwrap();
    ctx.render(0, &mut large).unwrap();
    assert_eq!(large.pixel(31, 7), [255, 0, 0, 255]);
}

#[test]
fn inconsistent_buffer_is_rejected() {
    let mut ctx = LottieEngine::new()
        .load(&source(), ExportKey::issue())
        .unwrap();
    let mut buf = PixelBuffer {
        width: 4,
        height: 4,
        data: vec![0; 10],
    };
    assert!(ctx.render(0, &mut buf).is_err());
}

#[test]
fn key_stays_bound_to_its_first_source() {
    let engine = LottieEngine::new();
    let key = ExportKey::issue();
    engine.load(&source(), key).unwrap();

    // Same bytes from a separate allocation still match.
    engine
        .load(&AnimationSource::from(DOC.to_string()), key)
        .unwrap();

    let other = DOC.replace("#ff0000", "#00ff00");
    let err = engine
        .load(&AnimationSource::from(other.clone()), key)
        .err()
        .unwrap();
    assert!(err.to_string().contains("different animation"), "{err}");

    engine.release(key);
    assert!(engine.load(&AnimationSource::from(other), key).is_ok());
}
