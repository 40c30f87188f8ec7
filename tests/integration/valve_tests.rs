//! Valve controller: PWM-held open, fully closed on command.

use std::time::Duration;

use intex::Error;
use intex::events::ActuatorId;
use intex::pins::{OUTLET_VALVE_GPIO, PRESSURE_TANK_VALVE_GPIO};

use crate::mock_hw::bench;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn open_valve_pulses_at_ten_percent() {
    let (mut hw, bench) = bench();
    hw.set(ActuatorId::PressureTankValve, true).unwrap();

    assert!(hw.advance_to(ms(199)).is_empty());
    assert_eq!(bench.writes(PRESSURE_TANK_VALVE_GPIO), vec![true]);

    for t in [200, 2_000, 2_200, 4_000] {
        assert!(hw.advance_to(ms(t)).is_empty());
    }
    assert_eq!(
        bench.writes(PRESSURE_TANK_VALVE_GPIO),
        vec![true, false, true, false, true]
    );
    assert_eq!(hw.next_deadline(), Some(ms(4_200)));
}

#[test]
fn close_mid_pulse_drives_off_and_stops_cycling() {
    let (mut hw, bench) = bench();
    hw.set(ActuatorId::OutletValve, true).unwrap();
    hw.advance_to(ms(100));
    hw.set(ActuatorId::OutletValve, false).unwrap();

    assert_eq!(bench.writes(OUTLET_VALVE_GPIO), vec![true, false]);
    assert!(!hw.valve(ActuatorId::OutletValve).unwrap().is_open());
    assert!(hw.timers().is_empty());

    hw.advance_to(ms(10_000));
    assert_eq!(bench.writes(OUTLET_VALVE_GPIO), vec![true, false]);
}

#[test]
fn open_twice_keeps_one_cycle() {
    let (mut hw, bench) = bench();
    hw.set(ActuatorId::OutletValve, true).unwrap();
    hw.set(ActuatorId::OutletValve, true).unwrap();
    assert_eq!(hw.timers().len(), 1);
    assert_eq!(bench.writes(OUTLET_VALVE_GPIO), vec![true]);
}

#[test]
fn fault_on_open_propagates() {
    let (mut hw, bench) = bench();
    bench.probe(OUTLET_VALVE_GPIO).invert_reads = true;

    let err = hw.set(ActuatorId::OutletValve, true).unwrap_err();
    assert!(matches!(err, Error::HardwareFault { attempted: true, .. }));
    assert!(!hw.valve(ActuatorId::OutletValve).unwrap().is_open());
}

#[test]
fn fault_during_cycle_is_reported_and_cycle_continues() {
    let (mut hw, bench) = bench();
    hw.set(ActuatorId::PressureTankValve, true).unwrap();
    bench.probe(PRESSURE_TANK_VALVE_GPIO).invert_reads = true;

    let failures = hw.advance_to(ms(200));
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        Error::HardwareFault {
            pin: PRESSURE_TANK_VALVE_GPIO,
            attempted: false
        }
    ));
    assert!(hw.valve(ActuatorId::PressureTankValve).unwrap().is_open());
    assert_eq!(hw.next_deadline(), Some(ms(2_000)));
}

#[test]
fn valve_accessor_is_stable() {
    let (hw, _bench) = bench();
    let a = hw.valve(ActuatorId::OutletValve).unwrap();
    let b = hw.valve(ActuatorId::OutletValve).unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(!std::ptr::eq(a, hw.valve(ActuatorId::PressureTankValve).unwrap()));
}

#[test]
fn stalled_loop_toggles_once_instead_of_replaying() {
    let (mut hw, bench) = bench();
    hw.set(ActuatorId::OutletValve, true).unwrap();

    assert!(hw.advance_to(ms(10_000)).is_empty());
    assert_eq!(bench.writes(OUTLET_VALVE_GPIO), vec![true, false]);
    assert_eq!(hw.next_deadline(), Some(ms(11_800)), "rest measured from 10 s");
}
