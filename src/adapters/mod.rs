//! Adapters: concrete implementations at the edges of the actuation core.
//!
//! | Adapter       | Provides             | Connects to                 |
//! |---------------|----------------------|-----------------------------|
//! | `hardware`    | `HardwareContext`    | five actuators + timer queue|
//! | `config_file` | `ConfigPort`         | JSON file on disk           |
//! | `log_sink`    | `log::Log`           | stderr, TCP, media files    |
//! | `time`        | `MonotonicClock`     | `std::time::Instant`        |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod time;
