//! Sub-message length slots.
//!
//! When a sub-message is opened its length is unknown, so the writer
//! reserves [`LENGTH_PLACEHOLDER_WIDTH`] bytes right after the tag and
//! fills them in at close time. [`LengthMode`] decides how.

/// Bytes reserved for every sub-message length.
///
/// Five varint bytes carry 35 bits, so any `u32` length fits.
pub const LENGTH_PLACEHOLDER_WIDTH: usize = 5;

/// Largest sub-message content a placeholder can describe.
pub const MAX_SUBMESSAGE_LEN: u64 = (1 << (7 * LENGTH_PLACEHOLDER_WIDTH)) - 1;

/// What `close` does with the reserved length slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthMode {
    /// Write the length as a non-minimal varint that fills the whole
    /// slot. Nothing moves; unused high groups cost a few bytes per
    /// sub-message.
    #[default]
    Padded,

    /// Write the minimal varint and shift the content left over the
    /// unused slot bytes. Output matches a canonical encoder, at the
    /// cost of one memmove of the sub-message per close.
    Compact,
}

impl LengthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthMode::Padded => "padded",
            LengthMode::Compact => "compact",
        }
    }
}
