//! Burnwire controller: full-power pulse with automatic shutoff.

use std::time::Duration;

use intex::Error;
use intex::events::ActuatorId;
use intex::pins::BURNWIRE_GPIO;

use crate::mock_hw::bench;

const BW: ActuatorId = ActuatorId::Burnwire;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn burnwire_turns_itself_off() {
    let (mut hw, bench) = bench();
    hw.set(BW, true).unwrap();
    assert!(bench.level(BURNWIRE_GPIO));

    hw.advance_to(Duration::from_millis(9_999));
    assert!(bench.level(BURNWIRE_GPIO));

    hw.advance_to(secs(10));
    assert!(!bench.level(BURNWIRE_GPIO));
    assert!(!hw.burnwire().shutoff_pending());
    assert_eq!(bench.writes(BURNWIRE_GPIO), vec![true, false]);
}

#[test]
fn no_pwm_at_full_power() {
    let (mut hw, bench) = bench();
    hw.set(BW, true).unwrap();
    hw.advance_to(secs(9));
    assert_eq!(bench.writes(BURNWIRE_GPIO), vec![true]);
}

#[test]
fn manual_off_keeps_stale_shutoff_harmless() {
    let (mut hw, bench) = bench();
    hw.set(BW, true).unwrap();
    hw.advance_to(secs(2));
    hw.set(BW, false).unwrap();
    assert!(hw.burnwire().shutoff_pending());

    hw.advance_to(secs(10));
    assert!(!bench.level(BURNWIRE_GPIO));
    assert_eq!(bench.writes(BURNWIRE_GPIO), vec![true, false, false]);
}

#[test]
fn off_then_on_is_not_cut_short() {
    let (mut hw, bench) = bench();
    hw.set(BW, true).unwrap();
    hw.advance_to(secs(6));
    hw.set(BW, false).unwrap();
    hw.set(BW, true).unwrap();

    hw.advance_to(secs(15));
    assert!(bench.level(BURNWIRE_GPIO), "first shutoff was replaced");

    hw.advance_to(secs(16));
    assert!(!bench.level(BURNWIRE_GPIO));
}

#[test]
fn faulted_energise_reports_idle_but_keeps_shutoff() {
    let (mut hw, bench) = bench();
    bench.probe(BURNWIRE_GPIO).invert_reads = true;

    let err = hw.set(BW, true).unwrap_err();
    assert!(matches!(err, Error::HardwareFault { pin: BURNWIRE_GPIO, attempted: true }));
    let row = hw.status().into_iter().find(|s| s.id == BW).unwrap();
    assert!(!row.active);
    assert!(hw.burnwire().shutoff_pending());
}

#[test]
fn burnwire_accessor_is_stable() {
    let (hw, _bench) = bench();
    assert!(std::ptr::eq(hw.burnwire(), hw.burnwire()));
}
