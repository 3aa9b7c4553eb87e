use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MvError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MvError::input_unavailable("x")
            .to_string()
            .contains("input unavailable:")
    );
    assert!(
        MvError::process_launch("x")
            .to_string()
            .contains("process launch failure:")
    );
    assert!(
        MvError::render_stream("x")
            .to_string()
            .contains("render stream failure:")
    );
}

#[test]
fn transcode_keeps_raw_status_description() {
    let err = MvError::transcode("exit status: 1", "Invalid data found");
    let text = err.to_string();
    assert!(text.contains("exit status: 1"));
    assert!(text.contains("Invalid data found"));
    assert_eq!(err.kind(), ErrorKind::Transcode);
}

#[test]
fn kinds_match_variants() {
    assert_eq!(MvError::Cancelled.kind(), ErrorKind::Cancelled);
    assert_eq!(
        MvError::TimedOut(Duration::from_secs(3)).kind(),
        ErrorKind::TimedOut
    );
    assert_eq!(MvError::validation("x").kind(), ErrorKind::Validation);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MvError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}
