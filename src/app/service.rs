//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the pattern store and binds protocol text to table
//! operations.  All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ ReplyPort
//!  LineMailbox ──▶│       AppService       │ ──▶ EventSink
//!                 │  parse · gate · store  │
//!  StoragePort ◀──└────────────────────────┘
//! ```
//!
//! Dispatch is cooperative and single-threaded: one `poll` pass either
//! fully resolves a pending line (exactly one reply for a recognized
//! command) or does nothing.  Nothing here blocks.

use log::trace;

use crate::store::{DeleteOutcome, EnrollOutcome, PatternStore, SlotId};
use crate::rx::LineMailbox;

use super::commands::{Command, Reply};
use super::events::AppEvent;
use super::ports::{EventSink, ReplyPort, SensorPort, StoragePort};

/// The command dispatcher.  Owned by the main loop.
pub struct AppService {
    store: PatternStore,
}

impl AppService {
    pub fn new(store: PatternStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    /// Send the one-time boot banner.  Call after store initialisation
    /// (and the configured settle delay) completes.
    pub fn announce_ready(&self, console: &mut impl ReplyPort, sink: &mut impl EventSink) {
        console.send_line(Reply::Ready.render().as_str());
        sink.emit(&AppEvent::Started {
            occupied: self.store.table().occupied(),
        });
    }

    /// One cooperative dispatch pass.
    ///
    /// Takes the pending line from the mailbox (if any), parses it, runs
    /// the table operation, and emits exactly one reply.  Unrecognized
    /// lines are dropped silently — no reply, no state change.
    pub fn poll(
        &mut self,
        mailbox: &LineMailbox,
        sensor: &mut impl SensorPort,
        console: &mut impl ReplyPort,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        let Some(line) = mailbox.take() else {
            return;
        };

        let Some(command) = Command::parse(&line) else {
            trace!("dispatcher: ignoring unrecognized line ({} bytes)", line.len());
            return;
        };

        let reply = match command {
            Command::Scan => self.cmd_scan(sensor, sink),
            Command::Enroll(id) => self.cmd_enroll(id, sensor, storage, sink),
            Command::Delete(id) => self.cmd_delete(id, storage, sink),
        };
        console.send_line(reply.render().as_str());
    }

    // ── Command semantics ─────────────────────────────────────

    /// Scan: presence gate first, then a fresh pattern read and an exact
    /// lookup.  With no subject present neither happens.
    fn cmd_scan(&mut self, sensor: &mut impl SensorPort, sink: &mut impl EventSink) -> Reply {
        if !sensor.presence() {
            sink.emit(&AppEvent::SubjectAbsent);
            return Reply::SubjectAbsent;
        }
        let pattern = sensor.read_pattern();
        match self.store.lookup(pattern) {
            Some(slot) => {
                sink.emit(&AppEvent::Matched { slot, pattern });
                Reply::Match(slot)
            }
            None => {
                sink.emit(&AppEvent::MatchFailed { pattern });
                Reply::NoMatch
            }
        }
    }

    /// Enroll: same presence gate as scan; a duplicate pattern in the slot
    /// writes nothing, anything else overwrites.
    fn cmd_enroll(
        &mut self,
        slot: SlotId,
        sensor: &mut impl SensorPort,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Reply {
        if !sensor.presence() {
            sink.emit(&AppEvent::SubjectAbsent);
            return Reply::SubjectAbsent;
        }
        let pattern = sensor.read_pattern();
        match self.store.enroll(storage, slot, pattern) {
            EnrollOutcome::Enrolled => {
                sink.emit(&AppEvent::Enrolled { slot, pattern });
                Reply::Enrolled
            }
            EnrollOutcome::AlreadyEnrolled => {
                sink.emit(&AppEvent::EnrollDuplicate { slot });
                Reply::AlreadyEnrolled
            }
        }
    }

    /// Delete needs no subject on the sensor.
    fn cmd_delete(
        &mut self,
        slot: SlotId,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Reply {
        match self.store.delete(storage, slot) {
            DeleteOutcome::Deleted => {
                sink.emit(&AppEvent::Deleted { slot });
                Reply::Deleted
            }
            DeleteOutcome::NotFound => {
                sink.emit(&AppEvent::DeleteMissing { slot });
                Reply::NotEnrolled
            }
        }
    }
}
