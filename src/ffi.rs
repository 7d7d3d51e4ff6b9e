//! Foreign entry points.
//!
//! Every function returns a bare boolean: `true` means the check passed,
//! anything else (bad arguments, missing files, mismatch, even a panic) is
//! `false`. Diagnostics go to the log only.

use core::ffi::{c_char, CStr};
use std::panic::{self, UnwindSafe};
use std::path::Path;

use crate::binary_verify::{check_installed_library, check_integrity, verify_named_entry};

fn guarded<F: FnOnce() -> bool + UnwindSafe>(check: F) -> bool {
    panic::catch_unwind(check).unwrap_or_else(|_| {
        log::error!("integrity check panicked; reporting failure");
        false
    })
}

/// # Safety
/// `ptr` must be null or point at a NUL-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Verifies the library that contains this function.
#[no_mangle]
pub extern "C" fn native_integrity_check() -> bool {
    guarded(check_integrity)
}

/// Verifies `<library_dir>/<library file name>`.
///
/// # Safety
/// `library_dir` must be null or a valid NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn native_integrity_check_installed(library_dir: *const c_char) -> bool {
    let Some(dir) = str_arg(library_dir) else {
        log::warn!("check_installed: invalid library directory argument");
        return false;
    };
    guarded(|| check_installed_library(Path::new(dir)))
}

/// Verifies entry `entry` of container `container` against `expected_hex`.
///
/// # Safety
/// Each pointer must be null or a valid NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn native_integrity_verify_named_entry(
    container: *const c_char,
    entry: *const c_char,
    expected_hex: *const c_char,
) -> bool {
    let (Some(container), Some(entry), Some(expected)) = (str_arg(container), str_arg(entry), str_arg(expected_hex)) else {
        log::warn!("verify_named_entry: invalid string argument");
        return false;
    };
    guarded(|| verify_named_entry(Path::new(container), entry, expected))
}

#[no_mangle]
pub extern "C" fn native_integrity_version() -> u32 {
    0x000300
}

// Android JNI bindings
#[cfg(feature = "jni")]
mod android {
    use jni::objects::{JObject, JString};
    use jni::sys::{jboolean, JNI_FALSE, JNI_TRUE};
    use jni::JNIEnv;
    use std::path::Path;

    use super::guarded;
    use crate::binary_verify::{check_integrity, verify_named_entry};

    fn to_jboolean(value: bool) -> jboolean {
        if value {
            JNI_TRUE
        } else {
            JNI_FALSE
        }
    }

    fn read_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
        if value.is_null() {
            return None;
        }
        env.get_string(value).ok().map(Into::into)
    }

    #[no_mangle]
    pub extern "system" fn Java_com_azura_protect_NativeIntegrity_checkAppIntegrity<'local>(
        _env: JNIEnv<'local>,
        _this: JObject<'local>,
        _context: JObject<'local>,
    ) -> jboolean {
        log::info!("checkAppIntegrity called");
        to_jboolean(guarded(check_integrity))
    }

    #[no_mangle]
    pub extern "system" fn Java_com_azura_azuratime_util_SecurityBridge_verifyApkHash<'local>(
        mut env: JNIEnv<'local>,
        _this: JObject<'local>,
        apk_path: JString<'local>,
        target_entry: JString<'local>,
        expected_hash: JString<'local>,
    ) -> jboolean {
        let apk = read_string(&mut env, &apk_path);
        let entry = read_string(&mut env, &target_entry);
        let expected = read_string(&mut env, &expected_hash);
        let (Some(apk), Some(entry), Some(expected)) = (apk, entry, expected) else {
            log::warn!("verifyApkHash: invalid string argument");
            return JNI_FALSE;
        };
        to_jboolean(guarded(|| verify_named_entry(Path::new(&apk), &entry, &expected)))
    }
}
