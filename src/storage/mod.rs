//! Storage Module.
//!
//! Turns a resolved module location into a forward-only byte source:
//! - Raw file access for libraries extracted to disk.
//! - Entry streaming for libraries stored inside the installation package.
//!
//! Both kinds are drained in fixed-size chunks straight into the digest
//! engine, so peak memory is one chunk plus decompressor state no matter how
//! large the artifact is. Handles are owned by the source and released when
//! it is dropped, on every exit path.

pub mod archive;
pub mod raw_files;

use core::fmt;
use std::fs::File;
use std::io;

use crate::digest::Sha256;

/// Errors related to plain file access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// File not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Path exists but is not a regular file.
    NotAFile,
    /// IO error (generic).
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "File not found"),
            StorageError::PermissionDenied => write!(f, "Permission denied"),
            StorageError::NotAFile => write!(f, "Not a regular file"),
            StorageError::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound,
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied,
            _ => StorageError::IoError,
        }
    }
}

/// Errors related to reading entries out of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveError {
    /// The container could not be opened read-only or is not an archive.
    ContainerOpen,
    /// No entry with the requested name.
    EntryNotFound,
    /// The entry exists but cannot be decoded (unsupported method, bad header).
    Corrupt,
    /// Archive support was not compiled in.
    Unsupported,
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::ContainerOpen => write!(f, "Failed to open container"),
            ArchiveError::EntryNotFound => write!(f, "Entry not found in container"),
            ArchiveError::Corrupt => write!(f, "Container entry is unreadable"),
            ArchiveError::Unsupported => write!(f, "Archive support not compiled in"),
        }
    }
}

impl std::error::Error for ArchiveError {}

/// A scoped, sequential source of artifact bytes.
pub enum ByteSource {
    /// A plain file on disk.
    File(File),
    /// An entry inside a container; the container handle lives as long as the source.
    #[cfg(feature = "archive")]
    Entry(archive::ArchiveEntry),
}

impl ByteSource {
    /// Drains the source into `engine` in `chunk_size` pieces, consuming it.
    /// Returns the number of bytes hashed.
    pub fn hash_into(self, engine: &mut Sha256, chunk_size: usize) -> io::Result<u64> {
        match self {
            ByteSource::File(mut file) => engine.update_reader(&mut file, chunk_size),
            #[cfg(feature = "archive")]
            ByteSource::Entry(entry) => entry.hash_into(engine, chunk_size),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ByteSource::File(_) => "file",
            #[cfg(feature = "archive")]
            ByteSource::Entry(_) => "archive entry",
        }
    }
}
