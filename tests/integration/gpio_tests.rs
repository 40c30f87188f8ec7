//! Verified-write behaviour of GPIO lines as seen through the actuators.

use intex::Error;
use intex::config::HardwareConfig;
use intex::events::ActuatorId;
use intex::pins::{BURNWIRE_GPIO, OUTLET_VALVE_GPIO, PRESSURE_TANK_VALVE_GPIO};

use crate::mock_hw::{PinCall, bench, bench_with};

#[test]
fn confirmed_write_needs_one_attempt() {
    let (mut hw, bench) = bench();
    bench.clear(BURNWIRE_GPIO);

    hw.set(ActuatorId::Burnwire, true).unwrap();
    assert_eq!(
        bench.probe(BURNWIRE_GPIO).calls,
        vec![PinCall::Write(true), PinCall::Read(true)]
    );
}

#[test]
fn opposite_readback_fails_after_three_writes() {
    let (mut hw, bench) = bench();
    bench.probe(BURNWIRE_GPIO).invert_reads = true;
    bench.clear(BURNWIRE_GPIO);

    let err = hw.set(ActuatorId::Burnwire, true).unwrap_err();
    assert!(matches!(
        err,
        Error::HardwareFault {
            pin: BURNWIRE_GPIO,
            attempted: true
        }
    ));
    assert_eq!(bench.writes(BURNWIRE_GPIO), vec![true; 3]);
}

#[test]
fn transient_mismatch_is_retried() {
    let (mut hw, bench) = bench();
    bench.probe(OUTLET_VALVE_GPIO).mismatches_left = 2;
    bench.clear(OUTLET_VALVE_GPIO);

    hw.set(ActuatorId::OutletValve, true).unwrap();
    assert_eq!(bench.writes(OUTLET_VALVE_GPIO), vec![true; 3]);
    assert!(bench.level(OUTLET_VALVE_GPIO));
}

#[test]
fn failed_export_is_not_fatal_but_faults_on_use() {
    let (mut hw, bench) = bench_with(&HardwareConfig::default(), |b| {
        b.probe(PRESSURE_TANK_VALVE_GPIO).fail_init = true;
    });

    // The other lines came up.
    hw.set(ActuatorId::OutletValve, true).unwrap();

    let err = hw.set(ActuatorId::PressureTankValve, true).unwrap_err();
    assert!(matches!(
        err,
        Error::HardwareFault {
            pin: PRESSURE_TANK_VALVE_GPIO,
            ..
        }
    ));
    assert!(bench.writes(PRESSURE_TANK_VALVE_GPIO).is_empty());
}

#[test]
fn initialize_is_idempotent() {
    let (mut hw, bench) = bench();
    assert!(hw.initialize_all().is_empty());
    let inits = bench
        .probe(BURNWIRE_GPIO)
        .calls
        .iter()
        .filter(|c| **c == PinCall::Init)
        .count();
    assert_eq!(inits, 1);
}

#[test]
fn reads_are_not_retried() {
    let (mut hw, bench) = bench();
    bench.clear(BURNWIRE_GPIO);
    assert!(!hw.read(ActuatorId::Burnwire).unwrap());
    assert_eq!(bench.probe(BURNWIRE_GPIO).calls, vec![PinCall::Read(false)]);
}
