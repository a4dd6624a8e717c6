//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, feed a future
//! telemetry channel, or record them in tests.

use crate::store::{Pattern, SlotId};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Store initialisation finished (carries occupied slot count).
    Started { occupied: usize },

    /// Scan hit.
    Matched { slot: SlotId, pattern: Pattern },

    /// Scan miss.
    MatchFailed { pattern: Pattern },

    /// Scan or enroll refused: presence line low.
    SubjectAbsent,

    /// Pattern stored.
    Enrolled { slot: SlotId, pattern: Pattern },

    /// Enroll skipped: slot already holds this pattern.
    EnrollDuplicate { slot: SlotId },

    /// Slot cleared.
    Deleted { slot: SlotId },

    /// Delete on an already-empty slot.
    DeleteMissing { slot: SlotId },
}
