use super::*;

#[test]
fn digest_is_deterministic_for_the_same_inputs() {
    let a = compute_digest("job-1", "print(1)", "container-1", 1000);
    let b = compute_digest("job-1", "print(1)", "container-1", 1000);
    assert_eq!(a, b);
}

#[test]
fn digest_changes_when_any_input_changes() {
    let base = compute_digest("job-1", "print(1)", "container-1", 1000);
    assert_ne!(base, compute_digest("job-2", "print(1)", "container-1", 1000));
    assert_ne!(base, compute_digest("job-1", "print(2)", "container-1", 1000));
    assert_ne!(base, compute_digest("job-1", "print(1)", "container-2", 1000));
    assert_ne!(base, compute_digest("job-1", "print(1)", "container-1", 1001));
}
