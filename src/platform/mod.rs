//! Host platform capabilities.
//!
//! The only thing the verifier needs from the host is "which file on disk
//! holds the code at this address". That lookup is loader-specific, so it
//! sits behind [`ModuleLocator`] and everything above it stays portable and
//! testable with a fake locator.

pub mod loader;

use core::fmt;
use std::ffi::OsString;

pub use loader::{current_locator, DlAddrLocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// No loader introspection on this target.
    NotSupported,
    /// The loader does not know a module containing the address.
    Unmapped,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::NotSupported => write!(f, "Platform feature not supported"),
            PlatformError::Unmapped => write!(f, "Address not mapped to a loaded module"),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Maps a live code address to the absolute path of the module that owns it.
///
/// The path is returned exactly as the loader reports it; it need not be UTF-8.
pub trait ModuleLocator {
    fn module_path(&self, address: usize) -> Result<OsString, PlatformError>;
}

impl<L: ModuleLocator + ?Sized> ModuleLocator for &L {
    fn module_path(&self, address: usize) -> Result<OsString, PlatformError> {
        (**self).module_path(address)
    }
}
