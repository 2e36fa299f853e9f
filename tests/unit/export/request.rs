use super::*;

fn dir() -> PathBuf {
    let dir = PathBuf::from("target").join("unit_request");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn defaults_use_native_rate_and_auto_workers() {
    let req = ExportRequest::new(AnimationSource::from("{}"), 64, 32, dir());
    assert_eq!(req.target_fps, 0.0);
    assert_eq!(req.workers, 0);
    assert_eq!(req.policy, FailurePolicy::Continue);
    assert_eq!(req.background, WHITE);
    assert!(req.key.is_none());
    assert_eq!(
        req.validate().unwrap(),
        Canvas {
            width: 64,
            height: 32
        }
    );
}

#[test]
fn rejects_zero_size_and_bad_fps() {
    let base = ExportRequest::new(AnimationSource::from("{}"), 64, 32, dir());

    let mut req = base.clone();
    req.width = 0;
    assert!(matches!(req.validate(), Err(ExportError::Validation(_))));

    let req = base.clone().with_target_fps(-30.0);
    assert!(matches!(req.validate(), Err(ExportError::Validation(_))));

    let req = base.with_target_fps(f64::NAN);
    assert!(matches!(req.validate(), Err(ExportError::Validation(_))));
}

#[test]
fn rejects_missing_output_directory() {
    let req = ExportRequest::new(
        AnimationSource::from("{}"),
        8,
        8,
        PathBuf::from("target").join("unit_request_missing_dir"),
    );
    let err = req.validate().unwrap_err();
    assert!(err.to_string().contains("unit_request_missing_dir"));
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let req = ExportRequest::new(AnimationSource::from("{}"), 8, 8, dir()).with_cancel(token.clone());
    assert!(!req.is_cancelled());
    token.cancel();
    assert!(req.is_cancelled());
}
