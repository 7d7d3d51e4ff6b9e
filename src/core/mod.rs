//! Byte-level primitives shared by the verification layer.
//!
//! - `xor`: constant-time XOR over equal-length buffers.
//! - `transform`: reversible 32-byte transforms used to keep the expected
//!   digest out of plain sight in the compiled artifact.

pub mod transform;
pub mod xor;

/// Constant-time equality for equal-length byte slices.
///
/// Length is not secret; a length mismatch returns early.
#[inline(always)]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ct_eq() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"ab"));
        assert!(ct_eq(b"", b""));
    }
}
