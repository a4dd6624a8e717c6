//! Mock hardware adapters for integration tests.
//!
//! Records every reply and event so tests can assert on the full command
//! history without touching real GPIO/UART/NVS.

use printlock::app::events::AppEvent;
use printlock::app::ports::{
    ConfigError, ConfigPort, EventSink, ReplyPort, SensorPort, StorageError, StoragePort,
};
use printlock::config::SystemConfig;
use printlock::rx::{LineAssembler, LineMailbox};
use printlock::store::Pattern;
use std::collections::HashMap;

// ── MockSensor ────────────────────────────────────────────────

/// Sensor head with scriptable presence and pattern lines.
pub struct MockSensor {
    pub present: bool,
    pub pattern: u8,
    /// Number of pattern reads — lets tests assert the presence gate
    /// short-circuits before any feature-line sample.
    pub reads: usize,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn absent() -> Self {
        Self {
            present: false,
            pattern: 0,
            reads: 0,
        }
    }

    pub fn with_pattern(pattern: u8) -> Self {
        Self {
            present: true,
            pattern,
            reads: 0,
        }
    }
}

impl SensorPort for MockSensor {
    fn presence(&mut self) -> bool {
        self.present
    }

    fn read_pattern(&mut self) -> Pattern {
        self.reads += 1;
        Pattern::new(self.pattern)
    }
}

// ── MockConsole ───────────────────────────────────────────────

/// Records every reply line the dispatcher sends.
#[derive(Default)]
pub struct MockConsole {
    pub lines: Vec<String>,
}

#[allow(dead_code)]
impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl ReplyPort for MockConsole {
    fn send_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// ── MemNvs ────────────────────────────────────────────────────

pub struct MemNvs {
    store: HashMap<String, Vec<u8>>,
}

#[allow(dead_code)]
impl MemNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }
}

impl Default for MemNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let k = format!("{}::{}", namespace, key);
        self.store.insert(k, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

impl ConfigPort for MemNvs {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(SystemConfig::default())
    }

    fn save(&self, _config: &SystemConfig) -> Result<(), ConfigError> {
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Captures every domain event for assertion.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Line injection ────────────────────────────────────────────

/// Push raw console input (terminator included) through a fresh assembler
/// into the mailbox, byte by byte — the same path the RX thread takes.
#[allow(dead_code)]
pub fn inject(mailbox: &LineMailbox, input: &[u8]) {
    let mut assembler = LineAssembler::new();
    for &byte in input {
        if let Some(line) = assembler.push_byte(byte) {
            mailbox.publish(line);
        }
    }
}
