//! Command-line grammar and reply vocabulary.
//!
//! One command per line, one reply per recognized command:
//!
//! | Request            | Success reply | Failure reply   |
//! |--------------------|---------------|-----------------|
//! | `S`                | `OK:<id>`     | `FAIL` / `NOF`  |
//! | `E<id>` (0–127)    | `ENOK`        | `ENEX` / `NOF`  |
//! | `D<id>` (0–127)    | `DELOK`       | `DNEX`          |
//!
//! Anything else is silently ignored — no reply, no state change.

use core::fmt::Write;

use crate::store::SlotId;

/// Parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Match the live pattern against the table.
    Scan,
    /// Store the live pattern at the given slot.
    Enroll(SlotId),
    /// Clear the given slot.
    Delete(SlotId),
}

impl Command {
    /// Parse a terminator-stripped command line.
    ///
    /// `S` must be the entire line; `S` with trailing bytes is not a
    /// command.  `E`/`D` take the leading decimal-digit run of the
    /// remainder as the slot argument — a non-digit stops the parse and an
    /// empty run reads as 0 (`atoi` semantics, which existing host tooling
    /// relies on).  Values above 127 clamp.
    pub fn parse(line: &[u8]) -> Option<Self> {
        match line {
            [b'S'] => Some(Self::Scan),
            [b'E', rest @ ..] => Some(Self::Enroll(parse_slot_arg(rest))),
            [b'D', rest @ ..] => Some(Self::Delete(parse_slot_arg(rest))),
            _ => None,
        }
    }
}

fn parse_slot_arg(digits: &[u8]) -> SlotId {
    let mut value: u32 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    SlotId::clamped(value)
}

// ───────────────────────────────────────────────────────────────
// Replies
// ───────────────────────────────────────────────────────────────

/// Every console reply the device can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Scan hit: pattern found at this slot.
    Match(SlotId),
    /// Scan miss: no slot holds the live pattern.
    NoMatch,
    /// Presence line low — scan/enroll refused before any read.
    SubjectAbsent,
    /// Pattern stored.
    Enrolled,
    /// Slot already holds exactly this pattern.
    AlreadyEnrolled,
    /// Slot cleared.
    Deleted,
    /// Delete on an already-empty slot.
    NotEnrolled,
    /// Boot banner, sent once after store initialisation.
    Ready,
}

impl Reply {
    /// Render the wire word, without the CRLF terminator (the console
    /// adapter appends it).
    pub fn render(&self) -> heapless::String<16> {
        let mut out = heapless::String::new();
        // "OK:127" is 6 bytes; capacity 16 cannot overflow.
        let _ = match self {
            Self::Match(id) => write!(out, "OK:{id}"),
            Self::NoMatch => write!(out, "FAIL"),
            Self::SubjectAbsent => write!(out, "NOF"),
            Self::Enrolled => write!(out, "ENOK"),
            Self::AlreadyEnrolled => write!(out, "ENEX"),
            Self::Deleted => write!(out, "DELOK"),
            Self::NotEnrolled => write!(out, "DNEX"),
            Self::Ready => write!(out, "READY"),
        };
        out
    }
}
