//! LEB128 varints.
//!
//! Seven payload bits per byte, least significant group first; the top
//! bit of each byte says "more bytes follow".
//!
//! Besides the canonical (minimal) form this module can write a
//! *padded* varint that fills an exact number of bytes. Decoders accept
//! non-minimal varints, which is what lets a writer reserve a fixed-size
//! length slot before it knows the length.

/// A `u64` never needs more than ten bytes.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes the minimal encoding of `value` occupies.
pub fn encoded_len(value: u64) -> usize {
    // ceil(significant_bits / 7); zero is treated as one bit so it takes one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Append the minimal encoding of `value` to `out`.
///
/// Returns the number of bytes written.
pub fn encode(mut value: u64, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
    out.len() - start
}

/// Write the minimal encoding of `value` at the front of `out`.
///
/// `out` must hold at least `encoded_len(value)` bytes.
pub fn write(mut value: u64, out: &mut [u8]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        out[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    out[i] = value as u8;
    i + 1
}

/// Whether `value` can be written as a padded varint of `width` bytes.
pub fn fits_in(value: u64, width: usize) -> bool {
    if width == 0 {
        return false;
    }
    if width >= MAX_VARINT_LEN {
        return true;
    }
    value >> (7 * width) == 0
}

/// Fill all of `out` with a (possibly non-minimal) encoding of `value`.
///
/// Every byte but the last carries the continuation bit, so the result
/// is exactly `out.len()` bytes long. Callers check [`fits_in`] first.
pub fn write_padded(value: u64, out: &mut [u8]) {
    debug_assert!(fits_in(value, out.len()));
    let last = out.len() - 1;
    let mut rest = value;
    for (i, byte) in out.iter_mut().enumerate() {
        let group = (rest & 0x7f) as u8;
        rest >>= 7;
        *byte = if i == last { group } else { group | 0x80 };
    }
}
