//! InTex payload controller: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  JsonConfigFile   MirrorLogger   MonotonicClock   stdin      │
//! │  (ConfigPort)     (log::Log)     (deadlines)      (commands) │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  CommandService ──▶ HardwareContext                    │  │
//! │  │  valves · heaters · burnwire · TimerQueue              │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  GpioLine ──▶ SysfsPin | SimulatedPin                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use intex::adapters::config_file::JsonConfigFile;
use intex::adapters::hardware::HardwareContext;
use intex::adapters::log_sink::MirrorLogger;
use intex::app::ports::ConfigPort;
use intex::config::BackendKind;
use intex::runtime::{self, EventLoop};

#[derive(Debug, Parser)]
#[command(version, about = "InTex payload actuation controller")]
struct Cli {
    /// JSON hardware configuration; defaults apply when the file is absent.
    #[arg(short, long, default_value = "intex.json")]
    config: PathBuf,

    /// Use simulated pins regardless of the configured backend.
    #[arg(long)]
    simulate: bool,

    /// Override the configured log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Do not mirror logs to removable media.
    #[arg(long)]
    no_media_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Configuration ──────────────────────────────────────
    let mut config = JsonConfigFile::new(&cli.config)
        .load()
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if cli.simulate {
        config.backend = BackendKind::Simulated;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── 2. Logging ────────────────────────────────────────────
    MirrorLogger::from_config(&config.logging, !cli.no_media_logs)
        .install()
        .context("installing logger")?;

    info!("InTex v{} ({:?} backend)", env!("CARGO_PKG_VERSION"), config.backend);

    // ── 3. Hardware ───────────────────────────────────────────
    let mut hw = HardwareContext::new(&config);
    let failures = hw.initialize_all();
    if !failures.is_empty() {
        warn!("{} lines failed to initialise; they will fault on use", failures.len());
    }

    // ── 4. Event loop ─────────────────────────────────────────
    let mut event_loop = EventLoop::new(hw, runtime::spawn_stdin_reader());
    event_loop
        .run(&mut io::stdout().lock())
        .context("writing replies")?;

    info!("InTex stopped");
    log::logger().flush();
    Ok(())
}
