use super::*;
use std::path::PathBuf;

#[test]
fn deadline_is_shorter_for_notebook_cells() {
    assert_eq!(deadline_for(JobMode::NotebookCell), NOTEBOOK_DEADLINE);
    assert_eq!(deadline_for(JobMode::Script), SCRIPT_DEADLINE);
}

#[test]
fn allowlisted_command_passes_validation() {
    assert!(validate_cli_allowlist("echo hello world").is_ok());
}

#[test]
fn non_allowlisted_command_is_rejected() {
    let err = validate_cli_allowlist("rm -rf /").unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn empty_cli_payload_is_rejected() {
    assert!(validate_cli_allowlist("   ").is_err());
}

#[test]
fn render_spec_enables_gpu_only_when_reported_available() {
    let scratch = PathBuf::from("/tmp/scene.t");
    let out = PathBuf::from("/tmp/out");
    let spec = render_spec(&scratch, &out, "job-1".into(), true);
    assert!(spec.caps.gpu);
    let spec = render_spec(&scratch, &out, "job-1".into(), false);
    assert!(!spec.caps.gpu);
}

#[test]
fn script_spec_mounts_scratch_read_only() {
    let scratch = PathBuf::from("/tmp/task.py");
    let spec = script_spec(&scratch, "job-1".into());
    assert!(spec.mounts[0].read_only);
    assert!(spec.caps.read_only_rootfs);
    assert!(!spec.caps.network);
}
