//! Identity Tokens
//!
//! Defines the unforgeable token issued to every registered party.
//!
//! # Identity Structure
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Identity                           │
//! ├──────────────────────────────────────────────────────────┤
//! │  registry: RegistryId   - Which registry issued it       │
//! │  slot: Slot             - Arena index within registry    │
//! │  label: Arc<str>        - Diagnostics only               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Equality, ordering and hashing look at `(registry, slot)` only. Two
//! parties registered under the same label are still different parties.

use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Source of process-unique registry ids.
static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(1);

/// Identifies one `Registry` instance for the lifetime of the process.
///
/// This is a newtype so that arbitrary integers cannot stand in for it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct RegistryId(u64);

impl RegistryId {
    /// Allocate the next unused registry id.
    pub(crate) fn next() -> Self {
        Self(NEXT_REGISTRY.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Get the raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An index into a registry's arena.
///
/// Only the arena hands these out.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Slot(usize);

impl Slot {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the index value.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An identity: an unforgeable token designating one registered party.
///
/// # Security Properties
/// - Cannot be constructed outside of `Registry::register`
/// - Safe to publish; holding it only allows *designating* its party
/// - Never compared by label
#[derive(Clone)]
pub struct Identity {
    registry: RegistryId,
    slot: Slot,
    label: Arc<str>,
}

impl Identity {
    pub(crate) fn new(registry: RegistryId, slot: Slot, label: Arc<str>) -> Self {
        Self {
            registry,
            slot,
            label,
        }
    }

    /// The registry that issued this identity.
    #[inline]
    pub fn registry(&self) -> RegistryId {
        self.registry
    }

    /// The arena slot this identity occupies in its registry.
    #[inline]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The human-readable label given at registration.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.registry == other.registry && self.slot == other.slot
    }
}

impl Eq for Identity {}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.registry, self.slot).cmp(&(other.registry, other.slot))
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.registry.hash(state);
        self.slot.hash(state);
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identity({}#{}.{})",
            self.label,
            self.registry.get(),
            self.slot.index()
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
