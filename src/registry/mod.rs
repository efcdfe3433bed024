//! Identity Registry
//!
//! Issues one unforgeable `Identity` per registered party, together with
//! that party's private sealing and unsealing capabilities.
//!
//! # Design
//! - A `Registry` is an explicit object, cheap to clone, safe to share
//!   across threads
//! - Identities are handles into the registry's arena; only the registry
//!   can mint them
//! - Registration always succeeds and is never undone
//!
//! # Security Properties
//! - An `Identity` designates a party but grants no authority to act as it
//! - The `Sealer` and `Unsealer` returned at registration are the party's
//!   private authority; whoever holds them speaks for the party

mod arena;
mod config;
mod identity;

pub use config::{RegistryConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LABEL_LEN};
pub use identity::{Identity, RegistryId, Slot};

use alloc::sync::Arc;
use core::fmt;

use log::debug;
use spin::RwLock;

use crate::disclosure::Unsealer;
use crate::envelope::Sealer;

use arena::Arena;

struct Shared {
    id: RegistryId,
    config: RegistryConfig,
    arena: RwLock<Arena>,
}

/// Issues identities and keeps them alive for the life of the registry.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        let id = RegistryId::next();
        debug!("[REGISTRY] created registry #{}", id.get());
        Self {
            shared: Arc::new(Shared {
                id,
                config,
                arena: RwLock::new(Arena::with_capacity(config.initial_capacity)),
            }),
        }
    }

    /// This registry's process-unique id.
    #[inline]
    pub fn id(&self) -> RegistryId {
        self.shared.id
    }

    /// The configuration this registry was created with.
    #[inline]
    pub fn config(&self) -> RegistryConfig {
        self.shared.config
    }

    /// Register a new party.
    ///
    /// Every call yields a fresh identity, unequal to every identity issued
    /// before, even when `label` repeats.
    pub fn register(&self, label: impl AsRef<str>) -> Registration {
        let label: Arc<str> = Arc::from(self.shared.config.clip_label(label.as_ref()));
        let slot = self.shared.arena.write().issue(label.clone());
        let identity = Identity::new(self.shared.id, slot, label);

        debug!("[REGISTRY] registered {:?}", identity);

        Registration {
            sealer: Sealer::new(self.clone(), identity.clone()),
            unsealer: Unsealer::new(identity.clone()),
            identity,
        }
    }

    /// Check whether this registry issued `identity`.
    pub fn issued(&self, identity: &Identity) -> bool {
        identity.registry() == self.shared.id
            && self.shared.arena.read().contains(identity.slot())
    }

    /// The label recorded for `identity`, if this registry issued it.
    pub fn label_of(&self, identity: &Identity) -> Option<Arc<str>> {
        if identity.registry() != self.shared.id {
            return None;
        }
        self.shared
            .arena
            .read()
            .lookup(identity.slot())
            .map(|entry| entry.label.clone())
    }

    /// Number of parties registered so far.
    pub fn len(&self) -> usize {
        self.shared.arena.read().len()
    }

    /// Check if no party has registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.shared.id.get())
            .field("parties", &self.len())
            .finish()
    }
}

/// What a party receives when it registers.
///
/// The identity is public. The sealer and unsealer are private to the
/// party and should not be handed to relays.
#[derive(Debug)]
pub struct Registration {
    identity: Identity,
    sealer: Sealer,
    unsealer: Unsealer,
}

impl Registration {
    /// The party's public identity.
    #[inline]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Capability to seal envelopes as this party.
    #[inline]
    pub fn sealer(&self) -> &Sealer {
        &self.sealer
    }

    /// Capability to open envelopes as this party.
    #[inline]
    pub fn unsealer(&self) -> &Unsealer {
        &self.unsealer
    }

    /// Split into `(identity, sealer, unsealer)`.
    pub fn into_parts(self) -> (Identity, Sealer, Unsealer) {
        (self.identity, self.sealer, self.unsealer)
    }
}
