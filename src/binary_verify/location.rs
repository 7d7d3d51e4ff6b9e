//! Where the library lives on disk.
//!
//! A loaded library is either a plain file the installer extracted, or an
//! entry read in place from the installation package. The loader reports the
//! latter as `<container><ext>!/<entry>`; this module tells the two apart.

use alloc::string::String;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::platform::{ModuleLocator, PlatformError};

/// The resolved on-disk origin of a loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocation {
    PlainFile { path: PathBuf },
    ArchiveEntry { container: PathBuf, entry: String },
}

/// Classifies a loader-reported path.
///
/// If `path` contains `<archive_extension>!`, everything up to and including
/// the extension is the container and everything after the `!`, minus at most
/// one leading `/`, is the entry. Otherwise the whole path is a plain file.
/// The container keeps the loader's bytes as they are; archive entry names are
/// UTF-8, so a non-UTF-8 entry can only ever miss.
pub fn classify<P: AsRef<OsStr> + ?Sized>(path: &P, archive_extension: &str) -> ModuleLocation {
    let path = path.as_ref();
    let bytes = path.as_encoded_bytes();
    let marker = format!("{}!", archive_extension);
    match find(bytes, marker.as_bytes()) {
        Some(at) => {
            let split = at + archive_extension.len();
            let rest = &bytes[split + 1..];
            let entry = rest.strip_prefix(b"/").unwrap_or(rest);
            ModuleLocation::ArchiveEntry {
                container: PathBuf::from(os_string_from(&bytes[..split])),
                entry: String::from_utf8_lossy(entry).into_owned(),
            }
        }
        None => ModuleLocation::PlainFile {
            path: PathBuf::from(path),
        },
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(unix)]
fn os_string_from(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
fn os_string_from(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Resolves a code address to a [`ModuleLocation`] through a host locator.
pub struct LocationResolver<L> {
    locator: L,
    archive_extension: String,
}

impl<L: ModuleLocator> LocationResolver<L> {
    pub fn new(locator: L, archive_extension: impl Into<String>) -> Self {
        Self {
            locator,
            archive_extension: archive_extension.into(),
        }
    }

    /// Resolves the module containing `address`. A fresh lookup every call:
    /// the install location can change between app updates.
    pub fn resolve_own_location(&self, address: usize) -> Result<ModuleLocation, PlatformError> {
        let path = self.locator.module_path(address)?;
        log::info!("Loaded library path: {}", Path::new(&path).display());
        Ok(classify(&path, &self.archive_extension))
    }
}

/// How the verifier finds the bytes it must hash.
pub trait LocationStrategy {
    fn locate(&self) -> Result<ModuleLocation, PlatformError>;
}

/// A fixed, caller-named location.
impl LocationStrategy for ModuleLocation {
    fn locate(&self) -> Result<ModuleLocation, PlatformError> {
        Ok(self.clone())
    }
}

/// The module that contains `address`, found through the loader.
pub struct SelfAddress<L> {
    resolver: LocationResolver<L>,
    address: usize,
}

impl<L: ModuleLocator> SelfAddress<L> {
    pub fn new(resolver: LocationResolver<L>, address: usize) -> Self {
        Self { resolver, address }
    }
}

impl<L: ModuleLocator> LocationStrategy for SelfAddress<L> {
    fn locate(&self) -> Result<ModuleLocation, PlatformError> {
        self.resolver.resolve_own_location(self.address)
    }
}

/// `<library_dir>/<file_name>`, for hosts that report their native library
/// directory instead of letting us ask the loader.
pub struct InstalledLibrary {
    library_dir: PathBuf,
    file_name: String,
}

impl InstalledLibrary {
    pub fn new(library_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            library_dir: library_dir.into(),
            file_name: file_name.into(),
        }
    }
}

impl LocationStrategy for InstalledLibrary {
    fn locate(&self) -> Result<ModuleLocation, PlatformError> {
        if self.library_dir.as_os_str().is_empty() || self.file_name.is_empty() {
            return Err(PlatformError::Unmapped);
        }
        Ok(ModuleLocation::PlainFile {
            path: self.library_dir.join(&self.file_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLocator(Option<&'static str>);

    impl ModuleLocator for FakeLocator {
        fn module_path(&self, _address: usize) -> Result<OsString, PlatformError> {
            self.0.map(OsString::from).ok_or(PlatformError::Unmapped)
        }
    }

    fn entry(container: &str, entry: &str) -> ModuleLocation {
        ModuleLocation::ArchiveEntry {
            container: PathBuf::from(container),
            entry: String::from(entry),
        }
    }

    #[test]
    fn test_classify_archive_entry() {
        assert_eq!(classify("/a/b/app.pkg!/lib/x/lib.so", ".pkg"), entry("/a/b/app.pkg", "lib/x/lib.so"));
        assert_eq!(
            classify("/data/app/com.example-1/base.apk!/lib/arm64-v8a/libnative.so", ".apk"),
            entry("/data/app/com.example-1/base.apk", "lib/arm64-v8a/libnative.so")
        );
    }

    #[test]
    fn test_classify_strips_at_most_one_separator() {
        assert_eq!(classify("/a/app.apk!lib/x.so", ".apk"), entry("/a/app.apk", "lib/x.so"));
        assert_eq!(classify("/a/app.apk!//lib/x.so", ".apk"), entry("/a/app.apk", "/lib/x.so"));
    }

    #[test]
    fn test_classify_plain_file() {
        assert_eq!(
            classify("/a/b/lib.so", ".pkg"),
            ModuleLocation::PlainFile { path: PathBuf::from("/a/b/lib.so") }
        );
        // Extension without the marker, or a marker for another extension.
        assert!(matches!(classify("/a/b/app.pkg/lib.so", ".pkg"), ModuleLocation::PlainFile { .. }));
        assert!(matches!(classify("/a/b/app.apk!/lib.so", ".pkg"), ModuleLocation::PlainFile { .. }));
    }

    #[test]
    fn test_classify_splits_at_first_marker() {
        assert_eq!(classify("/a/outer.apk!/inner.apk!/x.so", ".apk"), entry("/a/outer.apk", "inner.apk!/x.so"));
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_keeps_non_utf8_container_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/data/app/\xffcache/base.apk!/lib/x/lib.so");
        match classify(raw, ".apk") {
            ModuleLocation::ArchiveEntry { container, entry } => {
                assert_eq!(container.as_os_str().as_bytes(), b"/data/app/\xffcache/base.apk");
                assert_eq!(entry, "lib/x/lib.so");
            }
            other => panic!("unexpected {:?}", other),
        }

        let plain = OsStr::from_bytes(b"/data/\xfe/lib.so");
        assert_eq!(classify(plain, ".apk"), ModuleLocation::PlainFile { path: PathBuf::from(plain) });
    }

    #[test]
    fn test_resolver() {
        let resolver = LocationResolver::new(FakeLocator(Some("/a/b/app.pkg!/lib/x/lib.so")), ".pkg");
        assert_eq!(resolver.resolve_own_location(0x1000), Ok(entry("/a/b/app.pkg", "lib/x/lib.so")));

        let resolver = LocationResolver::new(FakeLocator(None), ".pkg");
        assert_eq!(resolver.resolve_own_location(0x1000), Err(PlatformError::Unmapped));
    }

    #[test]
    fn test_installed_library() {
        let strategy = InstalledLibrary::new("/data/app/lib/arm64", "libnative.so");
        assert_eq!(
            strategy.locate(),
            Ok(ModuleLocation::PlainFile { path: PathBuf::from("/data/app/lib/arm64/libnative.so") })
        );
        assert_eq!(InstalledLibrary::new("", "libnative.so").locate(), Err(PlatformError::Unmapped));
    }
}
