//! pbf-writer
//!
//! Streaming Protocol Buffers encoder for nested messages.
//!
//! A [`Writer`] appends fields to one caller-owned `Vec<u8>` in a single
//! forward pass. Opening a sub-message reserves a fixed-width length
//! slot; closing it patches the real length in. No sub-message is ever
//! buffered separately or measured in advance.
//!
//! - [`writer`] : the writer and its field operations
//! - [`frame`]  : frame handles and the open-frame stack entries
//! - [`buffer`] : the output buffer and its optional capacity limit
//! - [`length`] : placeholder width and the close-time length policy
//!
//! ```
//! use pbf_writer::Writer;
//!
//! let mut buf = Vec::new();
//! let mut w = Writer::new(&mut buf);
//! let root = w.root();
//! let person = w.open_submessage(root, 1)?;
//! w.add_string_field(person, 1, "Ada")?;
//! w.add_varint_field(person, 2, 36)?;
//! w.close(person)?;
//! let n = w.finish()?;
//! assert_eq!(n, buf.len());
//! # Ok::<(), pbf_writer::WriterError>(())
//! ```

pub mod buffer;
pub mod error;
pub mod frame;
pub mod length;
pub mod writer;

pub use error::WriterError;
pub use frame::Frame;
pub use length::{LengthMode, LENGTH_PLACEHOLDER_WIDTH, MAX_SUBMESSAGE_LEN};
pub use writer::Writer;

pub use pbf_core::{WireError, WireType};
