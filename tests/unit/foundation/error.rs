use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ExportError::invalid_animation("x")
            .to_string()
            .contains("invalid animation:")
    );
    assert!(
        ExportError::validation("x")
            .to_string()
            .contains("invalid export request:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ExportError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn failure_report_lists_every_index_and_cause() {
    let report = FailureReport {
        failures: vec![
            FrameFailure {
                index: 3,
                error: FrameError::Render {
                    native: 6,
                    source: anyhow::anyhow!("bad frame"),
                },
            },
            FrameFailure {
                index: 7,
                error: FrameError::Io {
                    path: PathBuf::from("out/007.png"),
                    source: std::io::Error::other("disk full"),
                },
            },
        ],
        total: 10,
        skipped: 0,
    };

    assert_eq!(report.failed_indices(), vec![3, 7]);
    let text = ExportError::Frames(report).to_string();
    assert!(text.starts_with("2 of 10 frames failed"));
    assert!(text.contains("frame 3: failed to render native frame 6: bad frame"));
    assert!(text.contains("frame 7: i/o error on 'out/007.png': disk full"));
}

#[test]
fn failure_report_mentions_skipped_frames() {
    let report = FailureReport {
        failures: vec![FrameFailure {
            index: 0,
            error: FrameError::ContextCreation {
                worker: 0,
                message: "parse error".to_string(),
            },
        }],
        total: 4,
        skipped: 2,
    };
    assert!(report.to_string().contains("(2 skipped)"));
}

#[test]
fn failure_report_accessor_only_matches_frames() {
    assert!(ExportError::validation("x").failure_report().is_none());
    assert!(
        ExportError::Frames(FailureReport::default())
            .failure_report()
            .is_some()
    );
}
