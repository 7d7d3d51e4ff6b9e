#![forbid(unsafe_code)]
//! Reversible transforms over 32-byte values.
//!
//! The expected digest is compiled in only in transformed form. Every variant
//! is an involution pair: `reverse(apply(x)) == x` and `apply(reverse(x)) == x`
//! for all inputs. None of them is a cipher; they only keep the plaintext
//! digest out of a naive scan of the binary.

use super::xor::{xor, xor_byte};

/// Width of every transformed value.
pub const WIDTH: usize = 32;

/// A named reversible transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Per-byte XOR with one fixed key byte.
    XorByte(u8),
    /// Per-position XOR with a 32-byte key.
    XorKey([u8; WIDTH]),
    /// Rotate each byte left by `rotate` bits, then XOR with `key`.
    RotateXor { key: u8, rotate: u32 },
}

impl Transform {
    /// Encodes `plain`.
    pub fn apply(&self, plain: &[u8; WIDTH]) -> [u8; WIDTH] {
        let mut out = [0u8; WIDTH];
        match self {
            Transform::XorByte(key) => xor_byte(plain, *key, &mut out),
            Transform::XorKey(key) => xor(plain, key, &mut out),
            Transform::RotateXor { key, rotate } => {
                for (o, p) in out.iter_mut().zip(plain.iter()) {
                    *o = p.rotate_left(rotate % 8) ^ key;
                }
            }
        }
        out
    }

    /// Decodes `encoded`; the inverse of [`Transform::apply`].
    pub fn reverse(&self, encoded: &[u8; WIDTH]) -> [u8; WIDTH] {
        let mut out = [0u8; WIDTH];
        match self {
            // XOR is its own inverse.
            Transform::XorByte(key) => xor_byte(encoded, *key, &mut out),
            Transform::XorKey(key) => xor(encoded, key, &mut out),
            Transform::RotateXor { key, rotate } => {
                for (o, e) in out.iter_mut().zip(encoded.iter()) {
                    *o = (e ^ key).rotate_right(rotate % 8);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<[u8; WIDTH]> {
        let mut ramp = [0u8; WIDTH];
        for (i, b) in ramp.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        vec![[0u8; WIDTH], [0xFF; WIDTH], ramp]
    }

    fn transforms() -> Vec<Transform> {
        let mut key = [0u8; WIDTH];
        for (i, b) in key.iter_mut().enumerate() {
            *b = 0x5A ^ (i as u8);
        }
        vec![
            Transform::XorByte(0xAA),
            Transform::XorByte(0x5A),
            Transform::XorKey(key),
            Transform::RotateXor { key: 0x3C, rotate: 3 },
            Transform::RotateXor { key: 0x00, rotate: 11 },
        ]
    }

    #[test]
    fn test_reverse_undoes_apply() {
        for t in transforms() {
            for plain in samples() {
                assert_eq!(t.reverse(&t.apply(&plain)), plain, "{:?}", t);
                assert_eq!(t.apply(&t.reverse(&plain)), plain, "{:?}", t);
            }
        }
    }

    #[test]
    fn test_apply_hides_plaintext() {
        let plain = samples()[2];
        for t in transforms() {
            assert_ne!(t.apply(&plain), plain, "{:?}", t);
        }
    }

    #[test]
    fn test_rotate_xor_known_byte() {
        let t = Transform::RotateXor { key: 0x0F, rotate: 1 };
        let mut plain = [0u8; WIDTH];
        plain[0] = 0b1000_0001;
        let encoded = t.apply(&plain);
        assert_eq!(encoded[0], 0b0000_0011 ^ 0x0F);
        assert_eq!(encoded[1], 0x0F);
    }
}
