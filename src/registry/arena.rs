//! Identity Arena
//!
//! The arena holds one entry per registered party and hands out the
//! `Slot` indices that identities are built from.
//!
//! # Design
//! - Append-only vector of entries
//! - Slots are addressed by `Slot` indices and never reused
//! - Operations: issue, lookup, contains

use alloc::sync::Arc;
use alloc::vec::Vec;

use super::identity::Slot;

/// One issued identity as the registry remembers it.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    /// Diagnostic label, already truncated.
    pub label: Arc<str>,
}

/// Append-only store of issued identities.
#[derive(Debug)]
pub(crate) struct Arena {
    entries: Vec<Entry>,
}

impl Arena {
    /// Create an empty arena with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Record a new entry and return its slot.
    ///
    /// Never fails; slots are never handed out twice.
    pub fn issue(&mut self, label: Arc<str>) -> Slot {
        let slot = Slot::new(self.entries.len());
        self.entries.push(Entry { label });
        slot
    }

    /// Look up the entry at a slot.
    #[inline]
    pub fn lookup(&self, slot: Slot) -> Option<&Entry> {
        self.entries.get(slot.index())
    }

    /// Check whether a slot has been issued.
    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        slot.index() < self.entries.len()
    }

    /// Number of issued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
