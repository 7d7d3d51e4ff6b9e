//! Integrity Verifier.
//!
//! One synchronous pass through a fixed state machine:
//!
//! ```text
//! Init -> ResolvingLocation -> SelectingSource -> OpeningFile | OpeningArchiveEntry
//!      -> Hashing -> Comparing -> Passed
//! ```
//!
//! Any stage may drop into `Failed(reason)`. An unconfigured expected digest
//! fails at `Init`, before the artifact is located or read. `Passed` and `Failed` are
//! terminal; there are no retries. The state is a value threaded through
//! [`IntegrityVerifier::step`], never stored anywhere shared, so concurrent
//! checks need no locking.

use alloc::string::String;
use std::path::{Path, PathBuf};

use super::expected_digest::{ExpectedDigestSource, ObfuscatedDigest};
use super::location::{InstalledLibrary, LocationResolver, LocationStrategy, ModuleLocation, SelfAddress};
use super::FailureReason;
use crate::config::IntegrityConfig;
use crate::digest::{ByteDigest, Sha256};
use crate::platform::current_locator;
use crate::storage::{archive, raw_files, ByteSource};

/// Verification progress.
enum Stage {
    Init,
    ResolvingLocation,
    SelectingSource(ModuleLocation),
    OpeningFile(PathBuf),
    OpeningArchiveEntry { container: PathBuf, entry: String },
    Hashing(ByteSource),
    Comparing(ByteDigest),
    Passed,
    Failed(FailureReason),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Init => "Init",
            Stage::ResolvingLocation => "ResolvingLocation",
            Stage::SelectingSource(_) => "SelectingSource",
            Stage::OpeningFile(_) => "OpeningFile",
            Stage::OpeningArchiveEntry { .. } => "OpeningArchiveEntry",
            Stage::Hashing(_) => "Hashing",
            Stage::Comparing(_) => "Comparing",
            Stage::Passed => "Passed",
            Stage::Failed(_) => "Failed",
        }
    }
}

/// Checks one artifact against one expected digest.
///
/// `S` decides where the bytes come from, `E` what they must hash to.
pub struct IntegrityVerifier<S, E> {
    strategy: S,
    expected: E,
    chunk_size: usize,
}

impl<S: LocationStrategy, E: ExpectedDigestSource> IntegrityVerifier<S, E> {
    pub fn new(strategy: S, expected: E) -> Self {
        Self::with_config(strategy, expected, &IntegrityConfig::default())
    }

    pub fn with_config(strategy: S, expected: E, config: &IntegrityConfig) -> Self {
        Self {
            strategy,
            expected,
            chunk_size: config.chunk_size,
        }
    }

    /// `true` only if the artifact's bytes hash to the expected digest.
    pub fn verify(&self) -> bool {
        match self.run() {
            Ok(()) => {
                log::info!("Hash match: integrity OK");
                true
            }
            Err(reason) => {
                log::warn!("Integrity check failed: {}", reason);
                false
            }
        }
    }

    /// Runs the state machine to a terminal stage.
    pub(crate) fn run(&self) -> Result<(), FailureReason> {
        let mut stage = Stage::Init;
        loop {
            stage = match stage {
                Stage::Passed => return Ok(()),
                Stage::Failed(reason) => return Err(reason),
                current => {
                    let from = current.name();
                    let next = self.step(current);
                    log::debug!("State transition: {} -> {}", from, next.name());
                    next
                }
            };
        }
    }

    fn step(&self, stage: Stage) -> Stage {
        match stage {
            Stage::Init => {
                if self.expected.is_configured() {
                    Stage::ResolvingLocation
                } else {
                    log::warn!("No expected digest configured for this build");
                    Stage::Failed(FailureReason::ExpectedUnavailable)
                }
            }

            Stage::ResolvingLocation => match self.strategy.locate() {
                Ok(location) => Stage::SelectingSource(location),
                Err(e) => {
                    log::warn!("Failed to resolve library location: {}", e);
                    Stage::Failed(FailureReason::LocationUnavailable)
                }
            },

            Stage::SelectingSource(ModuleLocation::PlainFile { path }) => Stage::OpeningFile(path),
            Stage::SelectingSource(ModuleLocation::ArchiveEntry { container, entry }) => {
                log::info!("Package path: {}, entry: {}", container.display(), entry);
                Stage::OpeningArchiveEntry { container, entry }
            }

            Stage::OpeningFile(path) => match raw_files::open_file(&path) {
                Ok(source) => Stage::Hashing(source),
                Err(e) => {
                    log::warn!("Library file unavailable: {}: {}", path.display(), e);
                    Stage::Failed(FailureReason::SourceUnavailable)
                }
            },

            Stage::OpeningArchiveEntry { container, entry } => match archive::open_entry(&container, &entry) {
                Ok(source) => Stage::Hashing(source),
                Err(e) => {
                    log::warn!("Package entry unavailable: {}!/{}: {}", container.display(), entry, e);
                    Stage::Failed(FailureReason::SourceUnavailable)
                }
            },

            Stage::Hashing(source) => {
                let kind = source.kind();
                let mut engine = Sha256::new();
                match source.hash_into(&mut engine, self.chunk_size) {
                    Ok(len) => {
                        log::debug!("Hashed {} bytes from {}", len, kind);
                        Stage::Comparing(engine.finalize())
                    }
                    Err(e) => {
                        log::warn!("Read failed while hashing {}: {}", kind, e);
                        Stage::Failed(FailureReason::ReadError)
                    }
                }
            }

            Stage::Comparing(actual) => {
                let expected = self.expected.reveal();
                log::debug!("Expected hash: {}", expected);
                log::debug!("Actual   hash: {}", actual);
                if actual.ct_eq(&expected) {
                    Stage::Passed
                } else {
                    Stage::Failed(FailureReason::DigestMismatch)
                }
            }

            terminal @ (Stage::Passed | Stage::Failed(_)) => terminal,
        }
    }
}

/// Verifies the library containing this function against the digest
/// compiled into it.
pub fn check_integrity() -> bool {
    let config = IntegrityConfig::default();
    let resolver = LocationResolver::new(current_locator(), config.archive_extension.clone());
    let strategy = SelfAddress::new(resolver, check_integrity as fn() -> bool as usize);
    IntegrityVerifier::with_config(strategy, ObfuscatedDigest::embedded(), &config).verify()
}

/// Verifies `<library_dir>/<configured library name>` against the digest
/// compiled into this library.
pub fn check_installed_library(library_dir: &Path) -> bool {
    let config = IntegrityConfig::default();
    let strategy = InstalledLibrary::new(library_dir, config.library_file_name.clone());
    IntegrityVerifier::with_config(strategy, ObfuscatedDigest::embedded(), &config).verify()
}

/// Verifies an arbitrary container entry against a caller-supplied hex digest.
pub fn verify_named_entry(container: &Path, entry: &str, expected_hex: &str) -> bool {
    let expected = match ByteDigest::from_hex(expected_hex) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Integrity check failed: {}: {}", FailureReason::ExpectedUnavailable, e);
            return false;
        }
    };
    let location = ModuleLocation::ArchiveEntry {
        container: container.to_path_buf(),
        entry: String::from(entry),
    };
    IntegrityVerifier::new(location, expected).verify()
}
