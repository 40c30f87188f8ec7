//! Mock pin backends for integration tests.
//!
//! Every pin handed to a [`HardwareContext`] is a [`MockPin`] sharing a
//! [`PinProbe`] with the test, so tests can assert on the full write
//! history and inject faults (refused export, misreporting reads) per
//! pin without touching sysfs.

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use intex::adapters::hardware::HardwareContext;
use intex::config::{HardwareConfig, PinConfig};
use intex::drivers::pin_backend::PinBackend;
use intex::error::BackendError;

// ── Pin call record ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCall {
    Init,
    Write(bool),
    Read(bool),
}

/// Shared state behind one mock pin.
#[derive(Debug, Default)]
pub struct PinProbe {
    pub calls: Vec<PinCall>,
    pub level: bool,
    pub initialized: bool,
    /// Refuse `initialize()` as if the export failed.
    pub fail_init: bool,
    /// Report the opposite of every written value.
    pub invert_reads: bool,
    /// Misreport only the next `n` reads.
    pub mismatches_left: usize,
}

impl PinProbe {
    pub fn writes(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PinCall::Write(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

// ── MockPin ───────────────────────────────────────────────────

pub struct MockPin {
    pin: u32,
    probe: Rc<RefCell<PinProbe>>,
}

impl PinBackend for MockPin {
    fn is_initialized(&self) -> bool {
        self.probe.borrow().initialized
    }

    fn initialize(&mut self, _config: &PinConfig) -> Result<(), BackendError> {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push(PinCall::Init);
        if probe.fail_init {
            return Err(BackendError::Io {
                path: PathBuf::from("/mock/export"),
                source: io::Error::other("export refused"),
            });
        }
        probe.initialized = true;
        Ok(())
    }

    fn set_logical_value(&mut self, on: bool) -> Result<(), BackendError> {
        let mut probe = self.probe.borrow_mut();
        if !probe.initialized {
            return Err(BackendError::Io {
                path: PathBuf::from(format!("/mock/gpio{}/value", self.pin)),
                source: io::Error::other("not exported"),
            });
        }
        probe.calls.push(PinCall::Write(on));
        probe.level = on;
        Ok(())
    }

    fn read_logical_value(&mut self) -> Result<bool, BackendError> {
        let mut probe = self.probe.borrow_mut();
        let mut value = probe.level;
        if probe.invert_reads {
            value = !value;
        } else if probe.mismatches_left > 0 {
            probe.mismatches_left -= 1;
            value = !value;
        }
        probe.calls.push(PinCall::Read(value));
        Ok(value)
    }
}

// ── MockBench ─────────────────────────────────────────────────

/// Probes for every pin of one [`HardwareContext`], keyed by GPIO number.
pub struct MockBench {
    probes: HashMap<u32, Rc<RefCell<PinProbe>>>,
}

#[allow(dead_code)]
impl MockBench {
    pub fn probe(&self, pin: u32) -> RefMut<'_, PinProbe> {
        self.probes[&pin].borrow_mut()
    }

    pub fn writes(&self, pin: u32) -> Vec<bool> {
        self.probes[&pin].borrow().writes()
    }

    pub fn level(&self, pin: u32) -> bool {
        self.probes[&pin].borrow().level
    }

    pub fn clear(&self, pin: u32) {
        self.probes[&pin].borrow_mut().calls.clear();
    }
}

/// Default configuration, mock pins, lines initialised.
pub fn bench() -> (HardwareContext, MockBench) {
    bench_with(&HardwareConfig::default(), |_| {})
}

/// Build a context on mock pins; `prepare` may arm faults before
/// initialisation.
pub fn bench_with(
    config: &HardwareConfig,
    prepare: impl FnOnce(&MockBench),
) -> (HardwareContext, MockBench) {
    let mut probes = HashMap::new();
    let mut hw = HardwareContext::with_backends(config, |pin| {
        let probe = Rc::new(RefCell::new(PinProbe::default()));
        probes.insert(pin.pin, Rc::clone(&probe));
        Box::new(MockPin {
            pin: pin.pin,
            probe,
        }) as Box<dyn PinBackend>
    });
    let bench = MockBench { probes };
    prepare(&bench);
    let _ = hw.initialize_all();
    (hw, bench)
}
