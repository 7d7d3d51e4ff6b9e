//! Start-up integrity self-check for a native library.
//!
//! At process start the library locates itself on disk (a plain file, or an
//! entry inside the installation package), hashes its own bytes with SHA-256
//! and compares the result with a digest embedded at build time. The outcome
//! is a single boolean; the host decides what to do with it.
//!
//! # Modules
//! - `digest`: streaming SHA-256 and the `ByteDigest` value type.
//! - `core`: reversible transforms that keep the embedded digest masked.
//! - `storage`: plain-file and package-entry byte sources.
//! - `platform`: host loader introspection.
//! - `binary_verify`: location resolution and the verification state machine.
//! - `ffi`: C ABI and (feature `jni`) JNI entry points.

extern crate alloc;

pub mod binary_verify;
pub mod config;
pub mod core;
pub mod digest;
pub mod ffi;
pub mod platform;
pub mod storage;

pub use binary_verify::{
    check_installed_library, check_integrity, classify, verify_named_entry, ExpectedDigestSource,
    FailureReason, InstalledLibrary, IntegrityVerifier, LocationResolver, LocationStrategy, ModuleLocation,
    ObfuscatedDigest, SelfAddress,
};
pub use config::IntegrityConfig;
pub use digest::{ByteDigest, DigestError, Sha256};
pub use platform::{ModuleLocator, PlatformError};
pub use storage::{archive::open_entry, raw_files::open_file, ArchiveError, ByteSource, StorageError};
