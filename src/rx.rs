//! Receive-line assembler and single-slot handoff mailbox.
//!
//! Bytes arrive in an asynchronous receive context (UART RX thread on the
//! device, stdin reader on the host); the main loop polls for completed
//! lines.  Two pieces:
//!
//! - [`LineAssembler`] — pure accumulator, owned by the producer.  Feeds
//!   bytes in, emits a completed [`CommandLine`] on CR/LF.
//! - [`LineMailbox`] — the producer/consumer cell.  Publishing while a line
//!   is still pending overwrites it: **last line wins, no queue**.  The
//!   critical section gives the happens-before edge from `publish` to
//!   `take`.
//!
//! ```text
//!  RX context ──▶ LineAssembler ──▶ LineMailbox ──▶ main loop poll
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

/// Line buffer capacity: up to 15 payload bytes per command.
pub const LINE_CAP: usize = 16;

/// One complete, terminator-stripped command line.
pub type CommandLine = heapless::Vec<u8, LINE_CAP>;

// ───────────────────────────────────────────────────────────────
// LineAssembler
// ───────────────────────────────────────────────────────────────

/// Byte-driven accumulator.  Single producer; no interior locking needed
/// because only the receive context touches it.
#[derive(Debug)]
pub struct LineAssembler {
    buf: CommandLine,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            buf: CommandLine::new(),
        }
    }

    /// Feed one received byte.
    ///
    /// - CR or LF completes the pending line (empty lines produce nothing);
    ///   accumulation restarts either way.
    /// - A byte that would exceed the payload limit discards the whole
    ///   partial line, including itself — silent drop, no partial command
    ///   ever escapes.
    pub fn push_byte(&mut self, byte: u8) -> Option<CommandLine> {
        match byte {
            b'\r' | b'\n' => {
                if self.buf.is_empty() {
                    None
                } else {
                    Some(core::mem::take(&mut self.buf))
                }
            }
            _ => {
                if self.buf.len() < LINE_CAP - 1 {
                    // Capacity checked above; push cannot fail.
                    let _ = self.buf.push(byte);
                } else {
                    self.buf.clear();
                }
                None
            }
        }
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// LineMailbox
// ───────────────────────────────────────────────────────────────

/// Single-slot cell between the receive context and the main loop.
///
/// Only one ready line exists at a time.  If a new line completes before
/// the previous one is consumed it silently replaces it — intentional
/// protocol behavior (see DESIGN.md for the bounded-queue alternative
/// that was deliberately not taken).
pub struct LineMailbox {
    slot: Mutex<RefCell<Option<CommandLine>>>,
}

impl LineMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Producer side: hand a completed line to the main loop, replacing
    /// any line still pending.
    pub fn publish(&self, line: CommandLine) {
        critical_section::with(|cs| {
            self.slot.borrow(cs).replace(Some(line));
        });
    }

    /// Consumer side: remove and return the pending line, if any.
    pub fn take(&self) -> Option<CommandLine> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }
}

impl Default for LineMailbox {
    fn default() -> Self {
        Self::new()
    }
}
