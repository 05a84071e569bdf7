use super::*;

#[test]
fn display_matches_wire_kebab_case() {
    assert_eq!(ErrorKind::ValidationError.to_string(), "validation-error");
    assert_eq!(ErrorKind::NotFound.to_string(), "not-found");
    assert_eq!(ErrorKind::TimeoutError.to_string(), "timeout-error");
}

#[test]
fn fabric_error_display_includes_message() {
    let err = FabricError::validation("mode is unknown");
    assert_eq!(err.to_string(), "validation-error: mode is unknown");
}

#[test]
fn serde_round_trip_preserves_kind() {
    let err = FabricError::not_found("job abc123 not found");
    let json = serde_json::to_string(&err).unwrap();
    let back: FabricError = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind, ErrorKind::NotFound);
    assert_eq!(back.message, "job abc123 not found");
}
