//! Mirroring logger.
//!
//! Implements [`log::Log`] so every `info!`/`warn!` in the crate lands in
//! three places at once:
//!
//! ```text
//!                 ┌──▶ stderr
//!  log::Record ───┼──▶ TCP syslog socket (optional)
//!                 └──▶ /media/usb<N>/log/intex.<k>.log  (one per location)
//! ```
//!
//! Lines look like `14:02:17 [WW] Heater 0: watchdog expired`.  A
//! destination that disappears or refuses writes is ignored; logging
//! never aborts an actuator operation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveTime};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::LoggingConfig;

/// Two-letter severity tag used in every mirrored line.
pub fn severity_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "CC",
        Level::Warn => "WW",
        Level::Info => "II",
        Level::Debug | Level::Trace => "DD",
    }
}

pub fn format_line(time: NaiveTime, level: Level, message: &str) -> String {
    format!("{} [{}] {}", time.format("%H:%M:%S"), severity_tag(level), message)
}

/// One past the largest `<prefix>.<n>.log` in `dir`, or 0 if there is none.
///
/// A file already at `u32::MAX` has no successor and is skipped.
pub fn next_log_index(dir: &Path, prefix: &str) -> io::Result<u32> {
    let mut next = 0;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };
        let index = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(".log"))
            .and_then(|n| n.parse::<u32>().ok())
            .and_then(|n| n.checked_add(1));
        if let Some(n) = index {
            next = next.max(n);
        }
    }
    Ok(next)
}

/// Create the next log file in `dir` and write its header line.
pub fn open_media_log(dir: &Path, prefix: &str) -> io::Result<(PathBuf, File)> {
    let index = next_log_index(dir, prefix)?;
    let path = dir.join(format!("{prefix}.{index}.log"));
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(
        file,
        "Log created at {}",
        Local::now().format("%Y-%m-%dT%H:%M:%S")
    )?;
    Ok((path, file))
}

#[derive(Default)]
struct Sinks {
    socket: Option<TcpStream>,
    files: Vec<File>,
}

pub struct MirrorLogger {
    level: LevelFilter,
    stderr: bool,
    sinks: Mutex<Sinks>,
    /// Setup problems, replayed through the logger once it is installed.
    setup_notes: Vec<(Level, String)>,
}

impl MirrorLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            stderr: true,
            sinks: Mutex::new(Sinks::default()),
            setup_notes: Vec::new(),
        }
    }

    /// Build from configuration.  `media` controls whether removable-media
    /// files are opened.
    pub fn from_config(config: &LoggingConfig, media: bool) -> Self {
        let mut logger = Self::new(config.level);
        if let Some(addr) = &config.syslog_addr {
            logger = logger.with_socket(addr);
        }
        if media {
            for index in 0..config.media_locations {
                logger = logger.with_media_dir(&config.media_dir(index), &config.file_prefix);
            }
        }
        logger
    }

    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    pub fn with_socket(mut self, addr: &str) -> Self {
        match TcpStream::connect(addr) {
            Ok(stream) => self.sinks_mut().socket = Some(stream),
            Err(e) => self
                .setup_notes
                .push((Level::Warn, format!("Log: syslog {addr} unavailable: {e}"))),
        }
        self
    }

    pub fn with_media_dir(mut self, dir: &Path, prefix: &str) -> Self {
        match open_media_log(dir, prefix) {
            Ok((path, file)) => {
                self.sinks_mut().files.push(file);
                self.setup_notes
                    .push((Level::Info, format!("Log: mirroring to {}", path.display())));
            }
            Err(e) => self.setup_notes.push((
                Level::Error,
                format!("Log: cannot create log file in {}: {e}", dir.display()),
            )),
        }
        self
    }

    /// Number of media files currently mirrored to.
    pub fn media_files(&self) -> usize {
        self.sinks.lock().map_or(0, |s| s.files.len())
    }

    /// Install as the global logger, then report any setup problems.
    pub fn install(mut self) -> Result<(), SetLoggerError> {
        let level = self.level;
        let notes = std::mem::take(&mut self.setup_notes);
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        for (level, note) in notes {
            log::log!(level, "{note}");
        }
        Ok(())
    }

    fn sinks_mut(&mut self) -> &mut Sinks {
        self.sinks.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn mirror(&self, line: &str) {
        if self.stderr {
            eprintln!("{line}");
        }
        let Ok(mut sinks) = self.sinks.lock() else {
            return;
        };
        if let Some(socket) = sinks.socket.as_mut() {
            let _ = writeln!(socket, "{line}");
        }
        for file in &mut sinks.files {
            let _ = writeln!(file, "{line}");
        }
    }
}

impl Log for MirrorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            Local::now().time(),
            record.level(),
            &record.args().to_string(),
        );
        self.mirror(&line);
    }

    fn flush(&self) {
        if let Ok(mut sinks) = self.sinks.lock() {
            if let Some(socket) = sinks.socket.as_mut() {
                let _ = socket.flush();
            }
            for file in &mut sinks.files {
                let _ = file.flush();
            }
        }
    }
}
