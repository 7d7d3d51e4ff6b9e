//! Digest values and the streaming engine that produces them.
//!
//! `ByteDigest` is the only currency between the verification stages: the
//! engine produces one, the expected-digest store reveals one, and the
//! verifier compares the two in constant time.

pub mod sha256;

use alloc::string::String;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub use sha256::{digest, Sha256, BLOCK_LEN, DEFAULT_CHUNK_SIZE};

/// Length of every digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Errors produced while parsing digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestError {
    /// Input did not encode exactly 32 bytes.
    InvalidLength,
    /// Input contained a non-hex character.
    InvalidHex,
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestError::InvalidLength => write!(f, "Digest must be {} bytes", DIGEST_LEN),
            DigestError::InvalidHex => write!(f, "Invalid hex digit in digest"),
        }
    }
}

impl std::error::Error for DigestError {}

/// A 256-bit digest. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ByteDigest([u8; DIGEST_LEN]);

impl ByteDigest {
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Parses a 64-digit hex string. Either case is accepted; surrounding
    /// whitespace is ignored.
    pub fn from_hex(text: &str) -> Result<Self, DigestError> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text.trim(), &mut out).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { .. } => DigestError::InvalidHex,
            _ => DigestError::InvalidLength,
        })?;
        Ok(Self(out))
    }

    /// Lower-case hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Constant-time comparison.
    pub fn ct_eq(&self, other: &ByteDigest) -> bool {
        crate::core::ct_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ByteDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteDigest({})", self.to_hex())
    }
}

impl fmt::Display for ByteDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
