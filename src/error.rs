//! Construction-time errors.
//!
//! Authorization failures are not errors: a denied unseal simply yields the
//! caller's fallback. The only failures surfaced as errors are programming
//! mistakes made while building an envelope.

use alloc::string::String;

/// Misuse detected while sealing an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SealError {
    /// Neither a recipient nor an access policy was given.
    #[error("envelope has no access policy")]
    MissingAccessPolicy,

    /// Both recipients and a custom access policy were given.
    #[error("envelope has both recipients and a custom access policy")]
    ConflictingPolicies,

    /// A recipient was issued by a different registry than the sealer.
    #[error("recipient `{label}` was not issued by the sealer's registry")]
    ForeignIdentity {
        /// Label of the offending identity.
        label: String,
    },
}
