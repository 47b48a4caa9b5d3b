use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ClashError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ClashError::config("x").to_string().contains("config error:"));
    assert!(ClashError::render("x").to_string().contains("render error:"));
    assert!(ClashError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn cancelled_reports_frame_count() {
    let err = ClashError::Cancelled { frames: 12 };
    assert!(err.is_cancelled());
    assert!(err.to_string().contains("12 frame"));
    assert!(!ClashError::render("x").is_cancelled());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ClashError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
