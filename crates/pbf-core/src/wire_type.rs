//! Wire types carried in the low three bits of every field tag.

/// How the bytes following a tag are laid out.
///
/// Only the four wire types a writer emits are modelled; the deprecated
/// group markers (3 and 4) are rejected by [`WireType::from_u8`].
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    /// LEB128 varint: int32, int64, uint32, uint64, sint32, sint64, bool, enum.
    Varint = 0,

    /// Eight little-endian bytes: fixed64, sfixed64, double.
    Fixed64 = 1,

    /// Varint length followed by that many bytes: string, bytes,
    /// embedded messages, packed repeated fields.
    Len = 2,

    /// Four little-endian bytes: fixed32, sfixed32, float.
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::Len),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}
