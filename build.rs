use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const EXPECTED_ENV: &str = "NATIVE_INTEGRITY_EXPECTED_SHA256";
const SEED_ENV: &str = "NATIVE_INTEGRITY_MASK_SEED";
const MASK_CONTEXT: &str = "native-integrity expected-digest mask v1";

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");

    // 生成 expected_digest.rs: the digest is stored masked, key and ciphertext apart
    let (expected, configured) = match env::var(EXPECTED_ENV) {
        Ok(value) => match parse_digest(value.trim()) {
            Some(digest) => (digest, true),
            None => {
                println!("cargo:warning={} is not a 64-digit hex digest; self-check will fail", EXPECTED_ENV);
                ([0u8; 32], false)
            }
        },
        Err(_) => {
            println!("cargo:warning={} not set; self-check will fail until a digest is supplied", EXPECTED_ENV);
            ([0u8; 32], false)
        }
    };

    let seed = env::var(SEED_ENV).unwrap_or_else(|_| {
        format!("{}-{}", env::var("CARGO_PKG_NAME").unwrap_or_default(), env::var("CARGO_PKG_VERSION").unwrap_or_default())
    });
    let mask = blake3::derive_key(MASK_CONTEXT, seed.as_bytes());

    let mut encoded = [0u8; 32];
    for (i, byte) in encoded.iter_mut().enumerate() {
        *byte = expected[i] ^ mask[i];
    }

    let generated = format!(
        "pub const EXPECTED_CONFIGURED: bool = {};\npub const ENCODED_EXPECTED: [u8; 32] = {:?};\npub const MASK_KEY: [u8; 32] = {:?};\n",
        configured, encoded, mask
    );
    let generated_path = out_dir.join("expected_digest.rs");
    fs::write(&generated_path, generated).expect("Failed to write expected_digest.rs");

    // 生成 cbindgen 头
    match cbindgen::generate(&crate_dir) {
        Ok(bindings) => {
            let header_path = Path::new("include/native_integrity.h");
            if let Some(parent) = header_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    println!("cargo:warning=Failed to create include/ directory: {}", e);
                }
            }
            if !bindings.write_to_file(header_path) {
                println!("cargo:warning=Failed to write native_integrity.h: check permissions");
            }
        }
        Err(e) => println!("cargo:warning=cbindgen generation failed: {}", e),
    }

    // Cargo 指令
    println!("cargo:rerun-if-env-changed={}", EXPECTED_ENV);
    println!("cargo:rerun-if-env-changed={}", SEED_ENV);
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=build.rs");
}

fn parse_digest(value: &str) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(value, &mut out).ok()?;
    Some(out)
}
