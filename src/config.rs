//! Configuration for the integrity check.
//!
//! Defines the run-time settings. The expected digest itself is a build-time
//! input (see `build.rs`), not part of this struct.

use alloc::string::String;

use crate::digest::DEFAULT_CHUNK_SIZE;

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct IntegrityConfig {
    /// Extension of the installation package. Combined with `!` it marks a
    /// loader path that points inside the package (e.g. `base.apk!/lib/…`).
    pub archive_extension: String,

    /// Bytes pulled from the source per read while hashing.
    pub chunk_size: usize,

    /// File name of this library inside the native library directory.
    pub library_file_name: String,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            archive_extension: String::from(".apk"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            library_file_name: String::from("libnative_integrity.so"),
        }
    }
}
