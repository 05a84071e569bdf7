use super::*;

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    let before = clock.now();
    let epoch_before = clock.epoch_ms();

    clock.advance(Duration::from_secs(5));

    assert_eq!(clock.now(), before + Duration::from_secs(5));
    assert_eq!(clock.epoch_ms(), epoch_before + 5_000);
}

#[test]
fn system_clock_epoch_ms_is_plausible() {
    let clock = SystemClock;
    // Any time after 2020-01-01 in ms since epoch.
    assert!(clock.epoch_ms() > 1_577_836_800_000);
}
