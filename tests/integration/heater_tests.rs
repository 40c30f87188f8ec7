//! Heater controller: hysteresis thermostat with a 10 s safety watchdog.

use std::time::Duration;

use intex::Error;
use intex::drivers::heater::HeaterState;
use intex::events::ActuatorId;
use intex::pins::{INNER_HEATER_GPIO, OUTER_HEATER_GPIO};

use crate::mock_hw::bench;

const INNER: ActuatorId = ActuatorId::InnerHeater;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn state(hw: &intex::adapters::hardware::HardwareContext) -> HeaterState {
    hw.heater(INNER).unwrap().state()
}

#[test]
fn sample_sequence_follows_hysteresis() {
    let (mut hw, bench) = bench();

    hw.temperature_changed(INNER, 10).unwrap();
    assert_eq!(state(&hw), HeaterState::Off, "10 is inside the band");
    assert!(bench.writes(INNER_HEATER_GPIO).is_empty());

    hw.temperature_changed(INNER, 4).unwrap();
    assert_eq!(state(&hw), HeaterState::On);
    assert!(hw.heater(INNER).unwrap().watchdog_armed());
    assert!(bench.level(INNER_HEATER_GPIO));

    hw.advance_to(secs(3));
    hw.temperature_changed(INNER, 4).unwrap();
    assert_eq!(state(&hw), HeaterState::On, "re-armed, still on");

    hw.temperature_changed(INNER, 25).unwrap();
    assert_eq!(state(&hw), HeaterState::Off);
    assert!(!hw.heater(INNER).unwrap().watchdog_armed());
    assert!(!bench.level(INNER_HEATER_GPIO));
    assert!(hw.timers().is_empty());
}

#[test]
fn in_band_sample_does_not_stop_a_running_heater() {
    let (mut hw, _bench) = bench();
    hw.temperature_changed(INNER, 4).unwrap();
    hw.temperature_changed(INNER, 12).unwrap();
    assert_eq!(state(&hw), HeaterState::On);
}

#[test]
fn watchdog_cuts_heater_after_ten_seconds() {
    let (mut hw, bench) = bench();
    hw.temperature_changed(INNER, 0).unwrap();

    assert!(hw.advance_to(Duration::from_millis(9_999)).is_empty());
    assert_eq!(state(&hw), HeaterState::On);

    assert!(hw.advance_to(secs(10)).is_empty());
    assert_eq!(state(&hw), HeaterState::Off);
    assert!(!bench.level(INNER_HEATER_GPIO));
    assert!(hw.timers().is_empty());
}

#[test]
fn rearm_extends_the_deadline() {
    let (mut hw, _bench) = bench();
    hw.temperature_changed(INNER, 0).unwrap();
    hw.advance_to(secs(7));
    hw.temperature_changed(INNER, 1).unwrap();

    hw.advance_to(secs(16));
    assert_eq!(state(&hw), HeaterState::On);
    hw.advance_to(secs(17));
    assert_eq!(state(&hw), HeaterState::Off);
}

#[test]
fn heaters_are_independent() {
    let (mut hw, bench) = bench();
    hw.temperature_changed(ActuatorId::OuterHeater, 2).unwrap();
    assert!(bench.level(OUTER_HEATER_GPIO));
    assert!(bench.writes(INNER_HEATER_GPIO).is_empty());
    assert_eq!(state(&hw), HeaterState::Off);
}

#[test]
fn manual_on_is_not_watched() {
    let (mut hw, _bench) = bench();
    hw.set(INNER, true).unwrap();
    hw.advance_to(secs(30));
    assert_eq!(state(&hw), HeaterState::On);
    hw.set(INNER, false).unwrap();
    assert_eq!(state(&hw), HeaterState::Off);
}

#[test]
fn fault_on_start_still_leaves_watchdog_to_cut_power() {
    let (mut hw, bench) = bench();
    bench.probe(INNER_HEATER_GPIO).invert_reads = true;

    let err = hw.temperature_changed(INNER, 0).unwrap_err();
    assert!(matches!(err, Error::HardwareFault { pin: INNER_HEATER_GPIO, .. }));
    assert!(hw.heater(INNER).unwrap().watchdog_armed());

    bench.probe(INNER_HEATER_GPIO).invert_reads = false;
    assert!(hw.advance_to(secs(10)).is_empty());
    assert!(!bench.level(INNER_HEATER_GPIO));
}

#[test]
fn temperature_for_non_heater_is_unsupported() {
    let (mut hw, _bench) = bench();
    for id in [ActuatorId::PressureTankValve, ActuatorId::Burnwire] {
        assert!(matches!(
            hw.temperature_changed(id, 0),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
