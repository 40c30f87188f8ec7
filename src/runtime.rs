//! The single cooperative event loop.
//!
//! One thread owns the [`HardwareContext`].  Operator lines arrive over a
//! channel; between them the loop sleeps exactly until the next timer
//! deadline, then fires everything due.  GPIO I/O stays on this thread,
//! so writes to different pins are strictly serialised.
//!
//! ```text
//!  stdin thread ──lines──▶ mpsc ──▶ ┌──────────────┐
//!                                   │  EventLoop   │──▶ replies (stdout)
//!  MonotonicClock ─deadline wait──▶ │ advance_to() │
//!                                   └──────────────┘
//! ```
//!
//! Nothing in a command handler sleeps; a slow backend write delays the
//! other timers by exactly its own duration.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;

use log::{debug, error, info};

use crate::adapters::hardware::HardwareContext;
use crate::adapters::time::MonotonicClock;
use crate::app::service::{CommandService, Reply};

/// Forward stdin lines over a channel.  The sender is dropped at EOF.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("Runtime: stdin closed");
    });
    rx
}

pub struct EventLoop {
    hw: HardwareContext,
    service: CommandService,
    clock: MonotonicClock,
    inbox: Receiver<String>,
}

impl EventLoop {
    pub fn new(hw: HardwareContext, inbox: Receiver<String>) -> Self {
        Self {
            hw,
            service: CommandService::new(),
            clock: MonotonicClock::new(),
            inbox,
        }
    }

    /// Serve commands until `quit` or the inbox closes, then turn every
    /// actuator off.
    pub fn run(&mut self, out: &mut impl Write) -> io::Result<()> {
        info!("Runtime: entering event loop");
        loop {
            self.fire_due();

            let received = match self.hw.next_deadline() {
                Some(deadline) => self.inbox.recv_timeout(self.clock.until(deadline)),
                None => self
                    .inbox
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            let line = match received {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            if line.trim().is_empty() {
                continue;
            }

            // Bring virtual time up to date so new timers start from now.
            self.fire_due();
            let reply = self.service.handle_line(&mut self.hw, &line);
            writeln!(out, "{reply}")?;
            out.flush()?;
            if matches!(reply, Reply::Bye) {
                break;
            }
        }
        self.shutdown();
        Ok(())
    }

    pub fn into_hardware(self) -> HardwareContext {
        self.hw
    }

    fn fire_due(&mut self) {
        // Already logged by the context.
        let _ = self.hw.advance_to(self.clock.elapsed());
    }

    fn shutdown(&mut self) {
        let (handled, failed) = self.service.counts();
        info!("Runtime: shutting down after {handled} commands ({failed} failed)");
        let failures = self.hw.all_off();
        if !failures.is_empty() {
            error!("Runtime: {} actuators may still be on", failures.len());
        }
    }
}
