//! Zigzag mapping for signed integers (`sint32` / `sint64`).
//!
//! Interleaves non-negative and negative values (0, -1, 1, -2, 2, ...)
//! so that small magnitudes stay small after varint encoding. The
//! mapping is a bijection, so `i64::MIN` round-trips to `u64::MAX`.

pub fn encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

pub fn decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

pub fn encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

pub fn decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}
