//! InTex payload actuation library.
//!
//! Exposes the actuation core (verified GPIO lines, software PWM, valve,
//! heater, and burnwire controllers) plus the adapters the `intex` binary
//! wires together, so integration tests can drive everything on
//! simulated pins in virtual time.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod runtime;
pub mod scheduler;

pub use error::{Error, Result};
