//! Access and Trust Policies
//!
//! A sealing party attaches an `AccessPolicy` ("who may open this") and an
//! unsealing party supplies a `TrustPolicy` ("whose envelopes do I
//! believe"). Both are decision procedures over a `Credential` that the
//! disclosure protocol presents.
//!
//! # Security Principles
//! - Credentials are minted by the protocol, never by callers
//! - Comparison is by identity token, never by label or structure
//! - Fail-secure: an empty designation denies everyone

use alloc::collections::BTreeSet;
use core::fmt;

use crate::registry::Identity;

/// Outcome of evaluating a policy.
#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    /// The presented credential is accepted.
    Approved,
    /// The presented credential is rejected.
    Denied,
}

impl Verdict {
    /// Check if this verdict approves.
    #[inline]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<bool> for Verdict {
    #[inline]
    fn from(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Denied
        }
    }
}

/// A credential presented to a policy during one evaluation.
///
/// For an `AccessPolicy` it stands for the party attempting to open the
/// envelope; for a `TrustPolicy` it stands for the party that sealed it.
/// In both cases the protocol obtained it from a private capability, so it
/// cannot name anyone the caller does not actually control.
pub struct Credential<'a> {
    identity: &'a Identity,
}

impl<'a> Credential<'a> {
    #[inline]
    pub(crate) fn new(identity: &'a Identity) -> Self {
        Self { identity }
    }

    /// Check whether this credential belongs to `identity`.
    #[inline]
    pub fn is(&self, identity: &Identity) -> bool {
        self.identity == identity
    }

    /// Check whether this credential belongs to any of `identities`.
    pub fn is_any_of<'i, I>(&self, identities: I) -> bool
    where
        I: IntoIterator<Item = &'i Identity>,
    {
        identities.into_iter().any(|identity| self.is(identity))
    }

    /// Diagnostic label of the credential's party.
    #[inline]
    pub fn label(&self) -> &str {
        self.identity.label()
    }
}

impl fmt::Debug for Credential<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.identity.label())
    }
}

/// Decides who may open an envelope. Supplied by the sealing party.
pub trait AccessPolicy: Send + Sync {
    /// Evaluate the credential of the party attempting to open.
    fn evaluate(&self, opener: &Credential<'_>) -> Verdict;
}

/// Decides whose envelopes to believe. Supplied by the unsealing party.
pub trait TrustPolicy: Send + Sync {
    /// Evaluate the credential of the party that sealed the envelope.
    fn evaluate(&self, sender: &Credential<'_>) -> Verdict;
}

impl<F> AccessPolicy for F
where
    F: Fn(&Credential<'_>) -> bool + Send + Sync,
{
    #[inline]
    fn evaluate(&self, opener: &Credential<'_>) -> Verdict {
        Verdict::from(self(opener))
    }
}

impl<F> TrustPolicy for F
where
    F: Fn(&Credential<'_>) -> bool + Send + Sync,
{
    #[inline]
    fn evaluate(&self, sender: &Credential<'_>) -> Verdict {
        Verdict::from(self(sender))
    }
}

/// A set of designated parties, usable as either kind of policy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Principals {
    /// Every credential is accepted.
    Anyone,
    /// Only credentials of these identities are accepted.
    Exactly(BTreeSet<Identity>),
}

impl Principals {
    /// Accept exactly one party.
    pub fn only(identity: Identity) -> Self {
        Self::Exactly(BTreeSet::from([identity]))
    }

    /// Accept any of the given parties. An empty set accepts no one.
    pub fn any_of<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = Identity>,
    {
        Self::Exactly(identities.into_iter().collect())
    }

    /// Accept every party.
    pub const fn anyone() -> Self {
        Self::Anyone
    }

    /// The explicitly designated identities (empty for `Anyone`).
    pub fn designates(&self) -> impl Iterator<Item = &Identity> + '_ {
        let set = match self {
            Self::Anyone => None,
            Self::Exactly(set) => Some(set),
        };
        set.into_iter().flatten()
    }

    fn admits(&self, credential: &Credential<'_>) -> Verdict {
        match self {
            Self::Anyone => Verdict::Approved,
            Self::Exactly(set) => Verdict::from(set.contains(credential.identity)),
        }
    }
}

impl AccessPolicy for Principals {
    fn evaluate(&self, opener: &Credential<'_>) -> Verdict {
        self.admits(opener)
    }
}

impl TrustPolicy for Principals {
    fn evaluate(&self, sender: &Credential<'_>) -> Verdict {
        self.admits(sender)
    }
}
