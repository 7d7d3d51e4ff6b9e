//! Container entry access.
//!
//! Looks an entry up by name inside a zip-format container (an APK is one)
//! and streams its decompressed bytes. Without the `archive` feature every
//! lookup fails with [`ArchiveError::Unsupported`].

use super::{ArchiveError, ByteSource};
use std::path::Path;

#[cfg(feature = "archive")]
use crate::digest::Sha256;
#[cfg(feature = "archive")]
use std::fs::File;
#[cfg(feature = "archive")]
use std::io;
#[cfg(feature = "archive")]
use zip::result::ZipError;
#[cfg(feature = "archive")]
use zip::ZipArchive;

/// An open container positioned on one entry.
#[cfg(feature = "archive")]
pub struct ArchiveEntry {
    archive: ZipArchive<File>,
    index: usize,
}

#[cfg(feature = "archive")]
impl ArchiveEntry {
    pub(crate) fn hash_into(mut self, engine: &mut Sha256, chunk_size: usize) -> io::Result<u64> {
        let mut entry = self
            .archive
            .by_index(self.index)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        engine.update_reader(&mut entry, chunk_size)
    }
}

/// Opens `entry` inside `container` for sequential reading.
///
/// The entry name is matched exactly as stored in the central directory,
/// without a leading separator.
#[cfg(feature = "archive")]
pub fn open_entry<P: AsRef<Path>>(container: P, entry: &str) -> Result<ByteSource, ArchiveError> {
    let container = container.as_ref();
    let file = File::open(container).map_err(|e| {
        log::debug!("open container {}: {}", container.display(), e);
        ArchiveError::ContainerOpen
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        log::debug!("parse container {}: {}", container.display(), e);
        ArchiveError::ContainerOpen
    })?;

    let index = archive.index_for_name(entry).ok_or(ArchiveError::EntryNotFound)?;

    // Reject entries whose headers or compression method we cannot decode
    // now, so they surface as an open failure rather than a read failure.
    archive.by_index(index).map(drop).map_err(|e| match e {
        ZipError::FileNotFound => ArchiveError::EntryNotFound,
        other => {
            log::debug!("open entry {}: {}", entry, other);
            ArchiveError::Corrupt
        }
    })?;

    Ok(ByteSource::Entry(ArchiveEntry { archive, index }))
}

#[cfg(not(feature = "archive"))]
pub fn open_entry<P: AsRef<Path>>(container: P, entry: &str) -> Result<ByteSource, ArchiveError> {
    log::debug!(
        "archive support disabled; cannot read {} from {}",
        entry,
        container.as_ref().display()
    );
    Err(ArchiveError::Unsupported)
}
