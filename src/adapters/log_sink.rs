//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  A future telemetry
//! adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::store::TABLE_SLOTS;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { occupied } => {
                info!("START | table ready, {}/{} slots occupied", occupied, TABLE_SLOTS);
            }
            AppEvent::Matched { slot, pattern } => {
                info!("SCAN  | match slot={} pattern={}", slot, pattern);
            }
            AppEvent::MatchFailed { pattern } => {
                info!("SCAN  | no match for pattern={}", pattern);
            }
            AppEvent::SubjectAbsent => {
                info!("SCAN  | no subject on sensor");
            }
            AppEvent::Enrolled { slot, pattern } => {
                info!("ENROL | slot={} pattern={} stored", slot, pattern);
            }
            AppEvent::EnrollDuplicate { slot } => {
                info!("ENROL | slot={} already holds this pattern", slot);
            }
            AppEvent::Deleted { slot } => {
                info!("DEL   | slot={} cleared", slot);
            }
            AppEvent::DeleteMissing { slot } => {
                info!("DEL   | slot={} already empty", slot);
            }
        }
    }
}
