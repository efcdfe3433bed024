//! Envelopes and the Sealer
//!
//! An `Envelope` binds a message to the access policy of the party that
//! sealed it, plus that party's identity as the origin.
//!
//! # Envelope Structure
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Envelope<M>                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  message: M                  - Never exposed directly    │
//! │  access: dyn AccessPolicy    - Sealer's recipient check  │
//! │  origin: Identity            - Captured from the Sealer  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Security Properties
//! - No accessor, `Debug` output or serialization reveals any field
//! - The origin is taken from the private `Sealer`, never from the caller
//! - Immutable once sealed; clones share the same sealed body

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use log::trace;

use crate::error::SealError;
use crate::policy::{AccessPolicy, Principals};
use crate::registry::{Identity, Registry};

struct Sealed<M> {
    message: M,
    access: Box<dyn AccessPolicy>,
    origin: Identity,
}

/// An opaque sealed message.
///
/// Relays may clone, hold, drop or forward it. The only thing anyone can
/// do with its contents is hand it to an `Unsealer`.
pub struct Envelope<M> {
    sealed: Arc<Sealed<M>>,
}

impl<M> Envelope<M> {
    /// The sealing party's recipient policy.
    #[inline]
    pub(crate) fn access(&self) -> &dyn AccessPolicy {
        &*self.sealed.access
    }

    /// The identity of the party that sealed this envelope.
    #[inline]
    pub(crate) fn origin(&self) -> &Identity {
        &self.sealed.origin
    }

    /// The sealed message. Only reachable through a disclosure grant.
    #[inline]
    pub(crate) fn message(&self) -> &M {
        &self.sealed.message
    }
}

impl<M> Clone for Envelope<M> {
    fn clone(&self) -> Self {
        Self {
            sealed: Arc::clone(&self.sealed),
        }
    }
}

impl<M> fmt::Debug for Envelope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Envelope(<sealed>)")
    }
}

/// A party's private capability to seal envelopes under its own identity.
#[derive(Clone)]
pub struct Sealer {
    registry: Registry,
    identity: Identity,
}

impl Sealer {
    pub(crate) fn new(registry: Registry, identity: Identity) -> Self {
        Self { registry, identity }
    }

    /// The identity envelopes from this sealer carry as their origin.
    #[inline]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Seal `message` so that only parties `access` approves may open it.
    ///
    /// Nothing is evaluated here; the policy runs when someone unseals.
    pub fn seal<M, P>(&self, message: M, access: P) -> Envelope<M>
    where
        P: AccessPolicy + 'static,
    {
        self.seal_boxed(message, Box::new(access))
    }

    /// Start building an envelope with eager misuse checks.
    pub fn envelope<M>(&self, message: M) -> EnvelopeBuilder<'_, M> {
        EnvelopeBuilder {
            sealer: self,
            message,
            recipients: Vec::new(),
            access: None,
        }
    }

    fn seal_boxed<M>(&self, message: M, access: Box<dyn AccessPolicy>) -> Envelope<M> {
        trace!("[SEAL] {} sealed an envelope", self.identity);
        Envelope {
            sealed: Arc::new(Sealed {
                message,
                access,
                origin: self.identity.clone(),
            }),
        }
    }
}

impl fmt::Debug for Sealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sealer({:?})", self.identity)
    }
}

/// Builds an envelope, rejecting construction mistakes up front.
///
/// Either name recipients with [`recipient`](Self::recipient) or give a
/// custom policy with [`access`](Self::access), not both.
pub struct EnvelopeBuilder<'s, M> {
    sealer: &'s Sealer,
    message: M,
    recipients: Vec<Identity>,
    access: Option<Box<dyn AccessPolicy>>,
}

impl<'s, M> EnvelopeBuilder<'s, M> {
    /// Allow `identity` to open the envelope.
    pub fn recipient(mut self, identity: &Identity) -> Self {
        self.recipients.push(identity.clone());
        self
    }

    /// Allow every identity in `identities` to open the envelope.
    pub fn recipients<'i, I>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = &'i Identity>,
    {
        self.recipients.extend(identities.into_iter().cloned());
        self
    }

    /// Use a custom access policy.
    pub fn access<P>(mut self, access: P) -> Self
    where
        P: AccessPolicy + 'static,
    {
        self.access = Some(Box::new(access));
        self
    }

    /// Seal the envelope.
    ///
    /// # Errors
    /// - `MissingAccessPolicy` if no recipient or policy was given
    /// - `ConflictingPolicies` if both were given
    /// - `ForeignIdentity` if a recipient comes from another registry
    pub fn seal(self) -> Result<Envelope<M>, SealError> {
        let access: Box<dyn AccessPolicy> = match (self.access, self.recipients.is_empty()) {
            (Some(_), false) => return Err(SealError::ConflictingPolicies),
            (Some(access), true) => access,
            (None, true) => return Err(SealError::MissingAccessPolicy),
            (None, false) => {
                if let Some(foreign) = self
                    .recipients
                    .iter()
                    .find(|identity| !self.sealer.registry.issued(identity))
                {
                    return Err(SealError::ForeignIdentity {
                        label: foreign.label().to_string(),
                    });
                }
                Box::new(Principals::any_of(self.recipients))
            }
        };

        Ok(self.sealer.seal_boxed(self.message, access))
    }
}

impl<M> fmt::Debug for EnvelopeBuilder<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeBuilder")
            .field("sealer", self.sealer)
            .field("recipients", &self.recipients)
            .field("custom_access", &self.access.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Credential;
    use std::format;

    #[test]
    fn test_debug_hides_contents() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let envelope = alice
            .sealer()
            .seal("top secret", Principals::anyone());
        let rendered = format!("{envelope:?}");
        assert_eq!(rendered, "Envelope(<sealed>)");
        assert!(!rendered.contains("top secret"));
    }

    #[test]
    fn test_seal_captures_origin() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let envelope = alice.sealer().seal(1u32, Principals::anyone());
        assert_eq!(envelope.origin(), alice.identity());
        assert_eq!(*envelope.message(), 1);
    }

    #[test]
    fn test_seal_does_not_evaluate_policy() {
        use core::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc as StdArc;

        let registry = Registry::new();
        let alice = registry.register("alice");
        let touched = StdArc::new(AtomicBool::new(false));
        let flag = touched.clone();
        let _envelope = alice.sealer().seal("hi", move |_: &Credential<'_>| {
            flag.store(true, Ordering::SeqCst);
            true
        });
        assert!(!touched.load(Ordering::SeqCst));
    }

    #[test]
    fn test_clones_share_body() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let envelope = alice.sealer().seal(7u8, Principals::anyone());
        let copy = envelope.clone();
        assert!(core::ptr::eq(envelope.message(), copy.message()));
    }

    #[test]
    fn test_builder_missing_policy() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let err = alice.sealer().envelope("hi").seal().unwrap_err();
        assert_eq!(err, SealError::MissingAccessPolicy);
    }

    #[test]
    fn test_builder_conflicting_policies() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");
        let err = alice
            .sealer()
            .envelope("hi")
            .recipient(bob.identity())
            .access(Principals::anyone())
            .seal()
            .unwrap_err();
        assert_eq!(err, SealError::ConflictingPolicies);
    }

    #[test]
    fn test_builder_foreign_identity() {
        let registry = Registry::new();
        let elsewhere = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");
        let stranger = elsewhere.register("dave");
        let err = alice
            .sealer()
            .envelope("hi")
            .recipients([bob.identity(), stranger.identity()])
            .seal()
            .unwrap_err();
        assert_eq!(
            err,
            SealError::ForeignIdentity {
                label: "dave".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "recipient `dave` was not issued by the sealer's registry"
        );
    }

    #[test]
    fn test_builder_recipients() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");
        let carol = registry.register("carol");
        let envelope = alice
            .sealer()
            .envelope("hi")
            .recipient(bob.identity())
            .seal()
            .unwrap();

        let access = envelope.access();
        assert!(access.evaluate(&Credential::new(bob.identity())).is_approved());
        assert!(!access.evaluate(&Credential::new(carol.identity())).is_approved());
    }
}
