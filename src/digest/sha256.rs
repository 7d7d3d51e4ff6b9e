#![forbid(unsafe_code)]
// Streaming SHA-256 over `sha2`.
// - Output is independent of how the input is split across `update` calls.
// - No I/O in the core; `update_reader` pulls from a reader in fixed chunks.

use super::{ByteDigest, DIGEST_LEN};
use sha2::Digest;
use std::io::{self, Read};

/// Compression block size in bytes.
pub const BLOCK_LEN: usize = 64;

/// Read granularity used when hashing a stream.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Running hash state.
#[derive(Clone, Default)]
pub struct Sha256(sha2::Sha256);

impl Sha256 {
    pub fn new() -> Self {
        Self(sha2::Sha256::new())
    }

    /// Absorbs `data`.
    pub fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    /// Pulls `reader` to EOF in `chunk_size` pieces, absorbing each one.
    /// Returns the number of bytes consumed.
    pub fn update_reader<R: Read + ?Sized>(&mut self, reader: &mut R, chunk_size: usize) -> io::Result<u64> {
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.update(&buf[..n]);
            total += n as u64;
        }
        Ok(total)
    }

    /// Pads, finishes and returns the digest.
    pub fn finalize(self) -> ByteDigest {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&self.0.finalize());
        ByteDigest::from_bytes(out)
    }
}

/// One-shot convenience.
pub fn digest(data: &[u8]) -> ByteDigest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(data: &[u8]) -> String {
        digest(data).to_hex()
    }

    fn chunked(data: &[u8], chunk: usize) -> ByteDigest {
        let mut h = Sha256::new();
        for piece in data.chunks(chunk) {
            h.update(piece);
        }
        h.finalize()
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i as u32).wrapping_mul(2654435761).rotate_left(7) as u8).collect()
    }

    #[test]
    fn test_known_answers() {
        assert_eq!(hex_of(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(hex_of(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert_eq!(
            hex_of(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
    }

    #[test]
    fn test_million_a() {
        let data = vec![b'a'; 1_000_000];
        assert_eq!(
            chunked(&data, 8192).to_hex(),
            "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
        );
    }

    #[test]
    fn test_chunking_is_irrelevant() {
        let data = sample(20_000);
        let whole = digest(&data);
        for chunk in [1usize, 3, 63, BLOCK_LEN, 65, DEFAULT_CHUNK_SIZE] {
            assert_eq!(chunked(&data, chunk), whole, "chunk size {}", chunk);
        }
    }

    #[test]
    fn test_padding_boundaries() {
        // Lengths around the point where the length field spills into a second block.
        for len in [0usize, 1, 55, 56, 57, 63, 64, 65, 119, 120, 127, 128, 129] {
            let data = sample(len);
            let split = len / 3;
            let mut h = Sha256::new();
            h.update(&data[..split]);
            h.update(&data[split..]);
            assert_eq!(h.finalize(), digest(&data), "length {}", len);
            assert_eq!(digest(&data).as_bytes()[..], sha2::Sha256::digest(&data)[..], "length {}", len);
        }
    }

    #[test]
    fn test_update_reader_matches_one_shot() {
        let data = sample(50_001);
        for chunk in [1usize, 64, 8192] {
            let mut h = Sha256::new();
            let mut cursor = std::io::Cursor::new(&data);
            let n = h.update_reader(&mut cursor, chunk).unwrap();
            assert_eq!(n, data.len() as u64);
            assert_eq!(h.finalize(), digest(&data));
        }
    }

    #[test]
    fn test_update_reader_propagates_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            }
        }
        let mut h = Sha256::new();
        assert!(h.update_reader(&mut Broken, 16).is_err());
    }
}
