//! Loader introspection through `dladdr(3)`.

use super::{ModuleLocator, PlatformError};
use std::ffi::OsString;

/// Asks the dynamic loader which shared object contains an address.
///
/// On Android a library loaded straight from the APK reports a path of the
/// form `/data/app/…/base.apk!/lib/<abi>/libfoo.so`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DlAddrLocator;

#[cfg(unix)]
impl ModuleLocator for DlAddrLocator {
    fn module_path(&self, address: usize) -> Result<OsString, PlatformError> {
        use core::ffi::CStr;

        // SAFETY: `Dl_info` is plain data; all-zero is a valid "empty" value.
        let mut info: libc::Dl_info = unsafe { core::mem::zeroed() };
        // SAFETY: dladdr only reads loader tables and writes into `info`.
        let found = unsafe { libc::dladdr(address as *const libc::c_void, &mut info) };
        if found == 0 || info.dli_fname.is_null() {
            return Err(PlatformError::Unmapped);
        }
        // SAFETY: non-null `dli_fname` points at a NUL-terminated string owned
        // by the loader for as long as the module stays loaded.
        let name = unsafe { CStr::from_ptr(info.dli_fname) };
        Ok(path_from_cstr(name))
    }
}

#[cfg(not(unix))]
impl ModuleLocator for DlAddrLocator {
    fn module_path(&self, _address: usize) -> Result<OsString, PlatformError> {
        Err(PlatformError::NotSupported)
    }
}

/// Loader paths are raw bytes; keep them byte-for-byte.
#[cfg(unix)]
fn path_from_cstr(name: &core::ffi::CStr) -> OsString {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    OsStr::from_bytes(name.to_bytes()).to_os_string()
}

/// The locator for the platform this crate was built for.
pub fn current_locator() -> DlAddrLocator {
    DlAddrLocator
}
