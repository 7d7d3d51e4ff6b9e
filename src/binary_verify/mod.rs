//! Start-up self-verification of the native library.
//!
//! Find where the library physically lives, read its bytes back, hash them
//! and compare against the digest compiled into the library itself.
//!
//! # Components
//! - `expected_digest`: the known-good digest, stored only in transformed form.
//! - `location`: address-to-path resolution and `container!entry` classification.
//! - `verifier`: the single-pass state machine tying the pieces together.
//!
//! # Trust boundary
//! Every failure collapses to `false` at the public entry points. The reason
//! is logged for developers and never returned, so a caller probing the check
//! learns nothing beyond pass or fail.

pub mod expected_digest;
pub mod location;
pub mod verifier;

use core::fmt;

pub use expected_digest::{ExpectedDigestSource, ObfuscatedDigest};
pub use location::{classify, InstalledLibrary, LocationResolver, LocationStrategy, ModuleLocation, SelfAddress};
pub use verifier::{check_installed_library, check_integrity, verify_named_entry, IntegrityVerifier};

/// Why a verification did not pass. Internal diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The host could not map the module to a path.
    LocationUnavailable,
    /// The file or container entry could not be opened.
    SourceUnavailable,
    /// Reading the opened source failed part way.
    ReadError,
    /// No usable expected digest.
    ExpectedUnavailable,
    /// Content hash differs from the expected digest.
    DigestMismatch,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LocationUnavailable => write!(f, "Module location unavailable"),
            FailureReason::SourceUnavailable => write!(f, "Module bytes unavailable"),
            FailureReason::ReadError => write!(f, "I/O error while hashing"),
            FailureReason::ExpectedUnavailable => write!(f, "Expected digest unavailable"),
            FailureReason::DigestMismatch => write!(f, "Hash mismatch"),
        }
    }
}

impl std::error::Error for FailureReason {}
