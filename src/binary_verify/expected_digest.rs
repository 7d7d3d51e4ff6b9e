//! The known-good digest of the library.
//!
//! The build script masks the digest with a key derived at build time and
//! emits ciphertext and key as two separate constants, so the plaintext never
//! appears in the binary. This is deterrence against a string scan, nothing
//! more.

use crate::core::transform::Transform;
use crate::digest::{ByteDigest, DIGEST_LEN};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/expected_digest.rs"));
}

/// Anything that can hand the verifier a digest to compare against.
pub trait ExpectedDigestSource {
    fn reveal(&self) -> ByteDigest;

    /// `false` when no real digest was provided; the check then fails closed.
    fn is_configured(&self) -> bool {
        true
    }
}

/// A caller-supplied plaintext digest.
impl ExpectedDigestSource for ByteDigest {
    fn reveal(&self) -> ByteDigest {
        self.clone()
    }
}

/// A digest held in transformed form.
#[derive(Clone)]
pub struct ObfuscatedDigest {
    encoded: [u8; DIGEST_LEN],
    transform: Transform,
    configured: bool,
}

impl ObfuscatedDigest {
    /// Wraps an already-encoded value.
    pub const fn new(encoded: [u8; DIGEST_LEN], transform: Transform) -> Self {
        Self {
            encoded,
            transform,
            configured: true,
        }
    }

    /// Encodes `plain` under `transform`.
    pub fn seal(plain: &ByteDigest, transform: Transform) -> Self {
        Self::new(transform.apply(plain.as_bytes()), transform)
    }

    /// The digest compiled in by the build script.
    pub fn embedded() -> Self {
        Self {
            encoded: generated::ENCODED_EXPECTED,
            transform: Transform::XorKey(generated::MASK_KEY),
            configured: generated::EXPECTED_CONFIGURED,
        }
    }

    pub fn encoded(&self) -> &[u8; DIGEST_LEN] {
        &self.encoded
    }
}

impl ExpectedDigestSource for ObfuscatedDigest {
    fn reveal(&self) -> ByteDigest {
        ByteDigest::from_bytes(self.transform.reverse(&self.encoded))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
