#![forbid(unsafe_code)]
// Constant-time XOR engine.
// - Processes data in 8-byte words followed by a byte tail.
// - No unsafe and no secret-dependent branching; length checks are enforced at callers.
// - Used by `transform` to mask and unmask the embedded digest.

/// Constant-time XOR over `input` with `key`, writing into `out`.
/// Requires: `out.len() == input.len()` and `key.len() >= input.len()`.
#[inline(always)]
pub fn xor(input: &[u8], key: &[u8], out: &mut [u8]) {
    let len = out.len();
    let mut i = 0;

    while i + 8 <= len {
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        a.copy_from_slice(&input[i..i + 8]);
        b.copy_from_slice(&key[i..i + 8]);
        let x = u64::from_ne_bytes(a) ^ u64::from_ne_bytes(b);
        out[i..i + 8].copy_from_slice(&x.to_ne_bytes());
        i += 8;
    }

    while i < len {
        out[i] = input[i] ^ key[i];
        i += 1;
    }
}

/// XOR every byte of `input` with the single byte `key`, writing into `out`.
#[inline(always)]
pub fn xor_byte(input: &[u8], key: u8, out: &mut [u8]) {
    for (o, i) in out.iter_mut().zip(input.iter()) {
        *o = i ^ key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_roundtrip() {
        let data = (0..37).map(|i| i as u8).collect::<Vec<u8>>();
        let key = (0..37).map(|i| (i as u8).wrapping_mul(7).wrapping_add(3)).collect::<Vec<u8>>();
        let mut out = vec![0u8; 37];
        xor(&data, &key, &mut out);
        assert_ne!(out, data);
        let mut back = vec![0u8; 37];
        xor(&out, &key, &mut back);
        assert_eq!(back, data);
    }

    #[test]
    fn test_xor_byte_matches_repeated_key() {
        let data = [0x00u8, 0x5A, 0xFF, 0x13];
        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        xor_byte(&data, 0xAA, &mut a);
        xor(&data, &[0xAA; 4], &mut b);
        assert_eq!(a, b);
        assert_eq!(a, [0xAA, 0xF0, 0x55, 0xB9]);
    }
}
