//! Command path: protocol line → CommandService → HardwareContext → pins.

use std::time::Duration;

use intex::app::service::{CommandService, Reply};
use intex::pins::{INNER_HEATER_GPIO, OUTLET_VALVE_GPIO, PRESSURE_TANK_VALVE_GPIO};

use crate::mock_hw::bench;

#[test]
fn set_by_alias_drives_the_pin() {
    let (mut hw, bench) = bench();
    let mut svc = CommandService::new();

    let reply = svc.handle_line(&mut hw, "set valve1 on");
    assert_eq!(reply.to_string(), "ok");
    assert!(bench.level(OUTLET_VALVE_GPIO));
    assert!(!bench.level(PRESSURE_TANK_VALVE_GPIO));
}

#[test]
fn temperature_feed_reaches_heater() {
    let (mut hw, bench) = bench();
    let mut svc = CommandService::new();

    assert!(svc.handle_line(&mut hw, "temperature heater0 3").is_ok());
    assert!(bench.level(INNER_HEATER_GPIO));

    hw.advance_to(Duration::from_secs(10));
    assert!(!bench.level(INNER_HEATER_GPIO), "watchdog without fresh samples");
}

#[test]
fn hardware_fault_becomes_error_reply() {
    let (mut hw, bench) = bench();
    bench.probe(PRESSURE_TANK_VALVE_GPIO).invert_reads = true;
    let mut svc = CommandService::new();

    let reply = svc.handle_line(&mut hw, "set pressure_tank_valve on");
    assert_eq!(
        reply.to_string(),
        format!("error: hardware fault: pin {PRESSURE_TANK_VALVE_GPIO} did not read back on")
    );
    assert_eq!(svc.counts(), (0, 1));
}

#[test]
fn unknown_gpio_and_misdirected_samples_are_not_implemented() {
    let (mut hw, _bench) = bench();
    let mut svc = CommandService::new();

    for line in ["set valve2 on", "temperature valve0 4", "ignite burnwire"] {
        let reply = svc.handle_line(&mut hw, line);
        assert!(
            reply.to_string().starts_with("error: not implemented"),
            "{line}: {reply}"
        );
    }
    assert!(hw.timers().is_empty());
}

#[test]
fn status_reflects_commands() {
    let (mut hw, _bench) = bench();
    let mut svc = CommandService::new();
    svc.handle_line(&mut hw, "set burnwire on");

    let Reply::Status(rows) = svc.handle_line(&mut hw, "status") else {
        panic!("expected a status reply");
    };
    assert_eq!(rows.len(), 5);
    for row in rows {
        assert_eq!(row.active, row.id.as_str() == "burnwire", "{row}");
    }
}
