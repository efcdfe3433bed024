//! Frenemies - Reference-Identity Sealing
//!
//! Lets two parties that do not trust each other exchange a value through
//! a relay that may be malicious, without sharing any key material.
//!
//! # Model
//! - Every party registers once and receives a public [`Identity`] plus a
//!   private [`Sealer`] and [`Unsealer`]
//! - A sealer wraps a message in an [`Envelope`] together with an
//!   [`AccessPolicy`] naming who may open it
//! - An unsealer opens an envelope by supplying a [`TrustPolicy`] naming
//!   whose envelopes it believes, and a fallback
//! - The message is released only if both policies approve
//!
//! # Security Properties
//! - Identities are unforgeable: only a [`Registry`] can mint them and they
//!   compare by token, never by label
//! - Envelopes expose nothing; the disclosure protocol is the only path to
//!   the message
//! - A relay that is not the intended recipient always gets its own
//!   fallback back, whatever policy it supplies
//!
//! # Example
//! ```
//! use frenemies::{Principals, Registry};
//!
//! let registry = Registry::new();
//! let alice = registry.register("alice");
//! let bob = registry.register("bob");
//! let carol = registry.register("carol");
//!
//! let envelope = alice
//!     .sealer()
//!     .seal("hi", Principals::only(bob.identity().clone()));
//! let from_alice = Principals::only(alice.identity().clone());
//!
//! assert_eq!(bob.unsealer().unseal(&envelope, &from_alice, "nope"), "hi");
//! assert_eq!(carol.unsealer().unseal(&envelope, &from_alice, "nope"), "nope");
//! ```
//!
//! # Limits
//! Unforgeability rests on in-process references. Envelopes and identities
//! deliberately implement no serialization; carrying them across a process
//! boundary would need a cryptographic design instead.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod disclosure;
mod envelope;
mod error;
mod policy;
mod registry;

pub use disclosure::{Disclosure, Unsealer};
pub use envelope::{Envelope, EnvelopeBuilder, Sealer};
pub use error::SealError;
pub use policy::{AccessPolicy, Credential, Principals, TrustPolicy, Verdict};
pub use registry::{
    Identity, Registration, Registry, RegistryConfig, RegistryId, Slot, DEFAULT_INITIAL_CAPACITY,
    DEFAULT_MAX_LABEL_LEN,
};
