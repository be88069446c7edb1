//! pbf-core
//!
//! Pure Protocol Buffers wire primitives:
//! - wire types
//! - field tags
//! - varint (LEB128) and zigzag encodings
//!
//! Nothing here owns a buffer beyond the `Vec<u8>` it is handed; the
//! nesting-aware writer lives in the `pbf-writer` crate.

pub mod wire_type;
pub mod tag;
pub mod varint;
pub mod zigzag;
pub mod error;

pub use wire_type::WireType;
pub use error::WireError;
pub use tag::{MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS};
pub use varint::MAX_VARINT_LEN;
