//! Application core: actuation logic with no direct I/O.
//!
//! Controllers, the command service, and the configuration loader talk
//! to the outside world only through the **port traits** in [`ports`],
//! so the whole layer can be exercised with simulated pins and virtual
//! time.

pub mod commands;
pub mod ports;
pub mod service;
