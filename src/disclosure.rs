//! Disclosure Protocol
//!
//! Arbitrates whether a sealed message is released to the party trying to
//! open it. Disclosure requires agreement of both sides:
//!
//! ```text
//!  Unsealer(bob) ──opener=bob──▶ envelope.access ──Denied──▶ fallback
//!                                      │
//!                                  Approved
//!                                      │  (mints Grant)
//!                                      ▼
//!                  trust ◀──sender=envelope.origin
//!                    │
//!          Approved ─┴─ Denied
//!             │           │
//!          message     fallback
//! ```
//!
//! # Security Properties
//! - The opener credential comes from the private `Unsealer`, the sender
//!   credential from the envelope's sealed origin; the caller supplies
//!   neither
//! - On recipient denial the trust policy is never evaluated
//! - Both kinds of denial produce the same outcome
//! - No state is kept between attempts

use core::fmt;

use log::trace;

use crate::envelope::Envelope;
use crate::policy::{Credential, TrustPolicy, Verdict};
use crate::registry::Identity;

/// Proof that an envelope's access policy approved the current opener.
///
/// Only [`approve`] mints one, and only a grant can release a message, so
/// approval and hand-over cannot be separated by a caller.
struct Grant<'e, M> {
    envelope: &'e Envelope<M>,
}

impl<'e, M> Grant<'e, M> {
    /// Run the sender check and hand over the message if it passes.
    fn release<T: TrustPolicy + ?Sized>(self, trust: &T) -> Option<&'e M> {
        let sender = Credential::new(self.envelope.origin());
        match trust.evaluate(&sender) {
            Verdict::Approved => Some(self.envelope.message()),
            Verdict::Denied => None,
        }
    }
}

/// Phase one: present the opener to the sealing party's access policy.
fn approve<'e, M>(envelope: &'e Envelope<M>, opener: &Identity) -> Option<Grant<'e, M>> {
    let presented = Credential::new(opener);
    match envelope.access().evaluate(&presented) {
        Verdict::Approved => Some(Grant { envelope }),
        Verdict::Denied => None,
    }
}

/// Run both phases for one attempt.
fn run<'e, M, T>(envelope: &'e Envelope<M>, opener: &Identity, trust: &T) -> Option<&'e M>
where
    T: TrustPolicy + ?Sized,
{
    let released = approve(envelope, opener).and_then(|grant| grant.release(trust));
    trace!(
        "[UNSEAL] {} attempt: {}",
        opener,
        if released.is_some() { "disclosed" } else { "denied" }
    );
    released
}

/// Result of one unseal attempt.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Disclosure<M> {
    /// Both policies agreed; here is the message.
    Disclosed(M),
    /// Disclosure was refused; here is the caller's fallback.
    Denied(M),
}

impl<M> Disclosure<M> {
    /// Check if the message was disclosed.
    #[inline]
    pub fn is_disclosed(&self) -> bool {
        matches!(self, Self::Disclosed(_))
    }

    /// The message or the fallback, whichever this outcome holds.
    #[inline]
    pub fn into_inner(self) -> M {
        match self {
            Self::Disclosed(value) | Self::Denied(value) => value,
        }
    }

    /// The message, if it was disclosed.
    #[inline]
    pub fn disclosed(self) -> Option<M> {
        match self {
            Self::Disclosed(value) => Some(value),
            Self::Denied(_) => None,
        }
    }
}

/// A party's private capability to open envelopes as itself.
#[derive(Clone)]
pub struct Unsealer {
    identity: Identity,
}

impl Unsealer {
    pub(crate) fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// The identity presented to access policies by this unsealer.
    #[inline]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Attempt to open `envelope`, returning the message or `fallback`.
    ///
    /// `trust` decides whether the envelope's origin is acceptable. It is
    /// only consulted after the envelope's access policy has approved this
    /// party.
    pub fn unseal<M, T>(&self, envelope: &Envelope<M>, trust: &T, fallback: M) -> M
    where
        M: Clone,
        T: TrustPolicy + ?Sized,
    {
        self.disclose(envelope, trust, fallback).into_inner()
    }

    /// Like [`unseal`](Self::unseal), building the fallback only on denial.
    pub fn unseal_or_else<M, T, F>(&self, envelope: &Envelope<M>, trust: &T, fallback: F) -> M
    where
        M: Clone,
        T: TrustPolicy + ?Sized,
        F: FnOnce() -> M,
    {
        match self.open(envelope, trust) {
            Some(message) => message.clone(),
            None => fallback(),
        }
    }

    /// Attempt to open `envelope`, reporting which outcome occurred.
    pub fn disclose<M, T>(&self, envelope: &Envelope<M>, trust: &T, fallback: M) -> Disclosure<M>
    where
        M: Clone,
        T: TrustPolicy + ?Sized,
    {
        match self.open(envelope, trust) {
            Some(message) => Disclosure::Disclosed(message.clone()),
            None => Disclosure::Denied(fallback),
        }
    }

    fn open<'e, M, T>(&self, envelope: &'e Envelope<M>, trust: &T) -> Option<&'e M>
    where
        T: TrustPolicy + ?Sized,
    {
        run(envelope, &self.identity, trust)
    }
}

impl fmt::Debug for Unsealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsealer({:?})", self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Principals;
    use crate::registry::Registry;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_both_policies_agree() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");

        let envelope = alice
            .sealer()
            .seal("hi", Principals::only(bob.identity().clone()));
        let trust = Principals::only(alice.identity().clone());

        let outcome = bob.unsealer().disclose(&envelope, &trust, "nope");
        assert_eq!(outcome, Disclosure::Disclosed("hi"));
        assert!(outcome.is_disclosed());
    }

    #[test]
    fn test_trust_not_evaluated_on_access_denial() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");
        let carol = registry.register("carol");

        let envelope = alice
            .sealer()
            .seal("hi", Principals::only(bob.identity().clone()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let trust = move |_: &Credential<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        };

        assert_eq!(carol.unsealer().unseal(&envelope, &trust, "nope"), "nope");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(bob.unsealer().unseal(&envelope, &trust, "nope"), "hi");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_access_evaluated_once_per_attempt() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let expected = bob.identity().clone();
        let envelope = alice.sealer().seal(5u64, move |opener: &Credential<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            opener.is(&expected)
        });
        let trust = Principals::anyone();

        for _ in 0..3 {
            assert_eq!(bob.unsealer().unseal(&envelope, &trust, 0), 5);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_sender_credential_is_origin() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");

        let envelope = alice.sealer().seal("hi", Principals::anyone());
        let seen = Arc::new(spin::Mutex::new(None));
        let sink = seen.clone();
        let trust = move |sender: &Credential<'_>| {
            *sink.lock() = Some(std::string::String::from(sender.label()));
            false
        };

        assert_eq!(bob.unsealer().unseal(&envelope, &trust, "nope"), "nope");
        assert_eq!(seen.lock().as_deref(), Some("alice"));
    }

    #[test]
    fn test_unseal_or_else_is_lazy() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let bob = registry.register("bob");
        let envelope = alice
            .sealer()
            .seal(std::string::String::from("hi"), Principals::only(bob.identity().clone()));

        let value = bob
            .unsealer()
            .unseal_or_else(&envelope, &Principals::anyone(), || unreachable!());
        assert_eq!(value, "hi");

        let value = alice
            .unsealer()
            .unseal_or_else(&envelope, &Principals::anyone(), || "fallback".into());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_dyn_trust_policy() {
        let registry = Registry::new();
        let alice = registry.register("alice");
        let envelope = alice.sealer().seal(1i32, Principals::anyone());
        let trust: &dyn TrustPolicy = &Principals::only(alice.identity().clone());
        assert_eq!(alice.unsealer().unseal(&envelope, trust, -1), 1);
    }

    #[test]
    fn test_disclosure_accessors() {
        assert_eq!(Disclosure::Disclosed(1).disclosed(), Some(1));
        assert_eq!(Disclosure::Denied(2).disclosed(), None);
        assert_eq!(Disclosure::Denied(2).into_inner(), 2);
        assert!(!Disclosure::Denied(2).is_disclosed());
    }
}
