//! Field tags.
//!
//! A tag is the varint `(field_number << 3) | wire_type` that precedes
//! every field on the wire.

use crate::error::WireError;
use crate::wire_type::WireType;

/// Largest field number protobuf allows (29 bits).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Field numbers reserved for protobuf implementations.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// Check that `field` may appear in a tag.
pub fn validate_field_number(field: u32) -> Result<(), WireError> {
    if field == 0 || field > MAX_FIELD_NUMBER || RESERVED_FIELD_NUMBERS.contains(&field) {
        return Err(WireError::InvalidFieldNumber(field));
    }
    Ok(())
}

/// Build the tag value for `field` / `wire_type`.
pub fn encode(field: u32, wire_type: WireType) -> Result<u64, WireError> {
    validate_field_number(field)?;
    Ok((u64::from(field) << 3) | wire_type as u64)
}

/// Split a tag value back into field number and raw wire type bits.
pub fn split(tag: u64) -> (u64, u8) {
    (tag >> 3, (tag & 0x7) as u8)
}
