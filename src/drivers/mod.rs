//! Pin backends, the verified GPIO line, and the actuator drivers built
//! on top of it.

pub mod burnwire;
pub mod gpio_line;
pub mod heater;
pub mod pin_backend;
pub mod pwm;
pub mod sim_pin;
pub mod sysfs;
pub mod valve;
