//! Persistent pattern table.
//!
//! 128 id-indexed slots, each holding either the EMPTY sentinel or a 7-bit
//! pattern value.  The table is kept in RAM and written through to NVS on
//! every mutation, so enrolments survive power cycles.
//!
//! Persisted image (wire-compatible with earlier board revisions): one
//! init-marker byte followed by the 128 raw slot bytes, stored as a
//! single blob.  The marker is the only integrity check.

use core::fmt;

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};

/// Number of table slots; ids are `0..=127`.
pub const TABLE_SLOTS: usize = 128;

/// Sentinel marking an unused slot.  Pattern values are 7-bit, so `0xFF`
/// can never collide with a stored pattern.
pub const EMPTY: u8 = 0xFF;

/// Marker byte written once after first-boot initialisation.
pub const INIT_MARKER: u8 = 0x55;

const STORE_NAMESPACE: &str = "printlock";
const TABLE_KEY: &str = "table";
const IMAGE_LEN: usize = 1 + TABLE_SLOTS;

// ───────────────────────────────────────────────────────────────
// Domain values
// ───────────────────────────────────────────────────────────────

/// 7-bit feature pattern — the sole matching key, exact equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern(u8);

impl Pattern {
    /// Construct from a raw byte, masking to the low 7 bits.
    pub const fn new(raw: u8) -> Self {
        Self(raw & 0x7F)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Table index `0..=127`.  Out-of-range requests clamp to 127 — protocol
/// behavior, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotId(u8);

impl SlotId {
    /// Construct from any unsigned value, clamping to the table range.
    pub const fn clamped(raw: u32) -> Self {
        if raw > 127 { Self(127) } else { Self(raw as u8) }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// Operation outcomes
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// Pattern stored (a differing existing entry is silently overwritten).
    Enrolled,
    /// Slot already holds exactly this pattern; nothing written.
    AlreadyEnrolled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Slot cleared.
    Deleted,
    /// Slot was already empty.
    NotFound,
}

// ───────────────────────────────────────────────────────────────
// PatternTable — in-RAM image
// ───────────────────────────────────────────────────────────────

/// Fixed-capacity flat table, indexed directly by id.  Linear scan is fine:
/// capacity is protocol-bounded at 128.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    slots: [u8; TABLE_SLOTS],
}

impl PatternTable {
    /// All-EMPTY table.
    pub const fn empty() -> Self {
        Self {
            slots: [EMPTY; TABLE_SLOTS],
        }
    }

    fn from_image(image: &[u8; IMAGE_LEN]) -> Self {
        let mut slots = [EMPTY; TABLE_SLOTS];
        slots.copy_from_slice(&image[1..]);
        Self { slots }
    }

    fn write_image(&self, image: &mut [u8; IMAGE_LEN]) {
        image[0] = INIT_MARKER;
        image[1..].copy_from_slice(&self.slots);
    }

    pub fn is_empty_slot(&self, id: SlotId) -> bool {
        self.slots[id.index()] == EMPTY
    }

    /// Pattern stored at `id`, if the slot holds a valid 7-bit value.
    pub fn pattern_at(&self, id: SlotId) -> Option<Pattern> {
        match self.slots[id.index()] {
            raw if raw <= 0x7F => Some(Pattern::new(raw)),
            _ => None,
        }
    }

    /// First id (ascending — lowest wins on duplicates) whose slot equals
    /// `pattern` exactly.
    pub fn lookup(&self, pattern: Pattern) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|&slot| slot == pattern.value())
            .map(|id| SlotId::clamped(id as u32))
    }

    /// Number of non-EMPTY slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|&&slot| slot != EMPTY).count()
    }
}

// ───────────────────────────────────────────────────────────────
// PatternStore — table + write-through persistence
// ───────────────────────────────────────────────────────────────

/// Owns the table and keeps the NVS image in sync on every mutation.
pub struct PatternStore {
    table: PatternTable,
}

impl PatternStore {
    /// Load the persisted table, initialising it on first boot.
    ///
    /// If the blob is missing, truncated, or the init marker mismatches,
    /// every slot is reset to EMPTY and a fresh image is written.
    /// Idempotent; safe to call on every boot.
    pub fn open(storage: &mut impl StoragePort) -> Result<Self, StorageError> {
        let mut image = [0u8; IMAGE_LEN];
        match storage.read(STORE_NAMESPACE, TABLE_KEY, &mut image) {
            Ok(n) if n == IMAGE_LEN && image[0] == INIT_MARKER => {
                let table = PatternTable::from_image(&image);
                info!(
                    "PatternStore: loaded table, {}/{} slots occupied",
                    table.occupied(),
                    TABLE_SLOTS
                );
                Ok(Self { table })
            }
            Ok(_) | Err(StorageError::NotFound) => {
                info!("PatternStore: no valid table image, initialising");
                let store = Self {
                    table: PatternTable::empty(),
                };
                store.persist(storage)?;
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// In-memory store with no backing image yet.  Used when NVS is
    /// unavailable at boot; persistence resumes on the next mutation.
    pub const fn fresh() -> Self {
        Self {
            table: PatternTable::empty(),
        }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Exact-match lookup, lowest id wins.
    pub fn lookup(&self, pattern: Pattern) -> Option<SlotId> {
        self.table.lookup(pattern)
    }

    /// Store `pattern` at `id`.
    ///
    /// A slot already holding exactly this pattern is left untouched; a
    /// differing existing entry is overwritten without requiring an
    /// explicit delete first — re-enrolment is a single command.
    pub fn enroll(
        &mut self,
        storage: &mut impl StoragePort,
        id: SlotId,
        pattern: Pattern,
    ) -> EnrollOutcome {
        if self.table.slots[id.index()] == pattern.value() {
            return EnrollOutcome::AlreadyEnrolled;
        }
        self.table.slots[id.index()] = pattern.value();
        self.persist_or_warn(storage);
        EnrollOutcome::Enrolled
    }

    /// Clear slot `id`.
    pub fn delete(&mut self, storage: &mut impl StoragePort, id: SlotId) -> DeleteOutcome {
        if self.table.slots[id.index()] == EMPTY {
            return DeleteOutcome::NotFound;
        }
        self.table.slots[id.index()] = EMPTY;
        self.persist_or_warn(storage);
        DeleteOutcome::Deleted
    }

    fn persist(&self, storage: &mut impl StoragePort) -> Result<(), StorageError> {
        let mut image = [0u8; IMAGE_LEN];
        self.table.write_image(&mut image);
        storage.write(STORE_NAMESPACE, TABLE_KEY, &image)
    }

    // A failed write-through is logged, not propagated: the in-RAM table
    // stays authoritative and the next mutation retries the full image.
    fn persist_or_warn(&self, storage: &mut impl StoragePort) {
        if let Err(e) = self.persist(storage) {
            warn!("PatternStore: write-through failed ({e}), continuing in RAM");
        }
    }
}
