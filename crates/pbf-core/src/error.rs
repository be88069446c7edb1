//! Error types for the wire primitives.
//!
//! Values never fail to encode: every `u64`, and every `i64` through
//! zigzag or two's complement, has a varint form. The only thing that
//! can be wrong at this layer is the field number.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// Field number is zero, above `2^29 - 1`, or inside the
    /// implementation-reserved `19000..=19999` range.
    #[error("Invalid field number: {0}")]
    InvalidFieldNumber(u32),
}
