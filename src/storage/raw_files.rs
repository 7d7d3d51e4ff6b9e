//! Raw File Storage.
//!
//! Opens a library that the installer extracted to disk.

use super::{ByteSource, StorageError};

use std::fs::{self, File};
use std::path::Path;

/// Opens `path` read-only as a byte source.
///
/// The path must name an existing regular file; directories and other
/// special files are refused before anything is opened.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<ByteSource, StorageError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(StorageError::NotAFile);
    }
    let file = File::open(path)?;
    Ok(ByteSource::File(file))
}
