//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below exercises one controller (or the command path)
//! through a [`HardwareContext`](intex::adapters::hardware::HardwareContext)
//! built on mock pins, in virtual time.  No GPIO hardware is required.

mod burnwire_tests;
mod command_service_tests;
mod gpio_tests;
mod heater_tests;
mod mock_hw;
mod valve_tests;
