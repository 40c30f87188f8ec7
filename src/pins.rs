//! GPIO pin assignments for the InTex payload board.
//!
//! Single source of truth for the reference deployment.  The defaults in
//! [`crate::config::HardwareConfig`] reference these; a deployed config
//! file may still override any of them.
//!
//! Numbers are kernel GPIO numbers (BCM numbering on the Raspberry Pi).

// ---------------------------------------------------------------------------
// Valves (solenoid, held open by PWM pulses)
// ---------------------------------------------------------------------------

/// VALVE1_OPEN: pressure tank valve.
pub const PRESSURE_TANK_VALVE_GPIO: u32 = 5;
/// VALVE2_OPEN: outlet valve.
pub const OUTLET_VALVE_GPIO: u32 = 6;

// ---------------------------------------------------------------------------
// Heaters (resistive, PWM power-limited)
// ---------------------------------------------------------------------------

/// HEATER1_EN: inner heater.
pub const INNER_HEATER_GPIO: u32 = 19;
/// HEATER2_EN: outer heater.
pub const OUTER_HEATER_GPIO: u32 = 26;

// ---------------------------------------------------------------------------
// Burnwire (one-shot restraint release)
// ---------------------------------------------------------------------------

/// BURNWIRE1_EN.
pub const BURNWIRE_GPIO: u32 = 14;

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// All actuator outputs on this board drive low-side switches.
pub const OUTPUTS_ACTIVE_LOW: bool = true;
