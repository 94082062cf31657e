use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RisoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RisoError::precondition("x")
            .to_string()
            .contains("precondition failed:")
    );
    assert!(RisoError::render("x").to_string().contains("render error:"));
    assert!(
        RisoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RisoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_preconditions_are_user_warnings() {
    assert!(RisoError::precondition("load both images first").is_user_warning());
    assert!(!RisoError::validation("bad").is_user_warning());
    assert!(!RisoError::render("bad").is_user_warning());
}
