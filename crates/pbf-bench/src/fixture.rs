//! The benchmark message shape.
//!
//! ```text
//! root
//!   repeated Outer (field 1) x messages
//!     uint64 a = 1        -> u64::MAX
//!     int64  b = 2        -> i64::MIN (plain varint, ten bytes)
//!     string d = 4        -> "Hello, World!"
//!     repeated string e = 5 -> "Msg 1" .. "Msg 4"
//!     repeated Inner f = 99999 x 9
//!       uint64 id   = 1   -> 0..9
//!       string name = 2   -> "Inner Message"
//! ```
//!
//! This is a fixture for measuring the writer, not a schema anyone
//! consumes.

use pbf_writer::{Frame, LengthMode, Writer, WriterError};

pub const OUTER_FIELD: u32 = 1;
pub const INNER_FIELD: u32 = 99_999;
pub const INNER_PER_OUTER: u64 = 9;

const GREETING: &str = "Hello, World!";
const NOTES: [&str; 4] = ["Msg 1", "Msg 2", "Msg 3", "Msg 4"];
const INNER_NAME: &str = "Inner Message";

/// Write one outer message under `parent`.
pub fn write_outer(w: &mut Writer<'_>, parent: Frame) -> Result<(), WriterError> {
    w.with_submessage(parent, OUTER_FIELD, |w, outer| {
        w.add_varint_field(outer, 1, u64::MAX)?;
        w.add_int64_field(outer, 2, i64::MIN)?;
        w.add_string_field(outer, 4, GREETING)?;
        for note in NOTES {
            w.add_string_field(outer, 5, note)?;
        }
        for id in 0..INNER_PER_OUTER {
            let inner = w.open_submessage(outer, INNER_FIELD)?;
            w.add_varint_field(inner, 1, id)?;
            w.add_string_field(inner, 2, INNER_NAME)?;
            w.close(inner)?;
        }
        Ok(())
    })
}

/// Reusable encoder: keeps its scratch buffer between runs so repeated
/// encodes do not reallocate.
#[derive(Debug, Default)]
pub struct FixtureEncoder {
    scratch: Vec<u8>,
    mode: LengthMode,
}

impl FixtureEncoder {
    pub fn new(mode: LengthMode) -> Self {
        FixtureEncoder {
            scratch: Vec::new(),
            mode,
        }
    }

    /// Encode `messages` outer messages and copy them into `output`.
    ///
    /// Returns the number of bytes written to `output`.
    pub fn encode_into(&mut self, messages: usize, output: &mut [u8]) -> Result<usize, WriterError> {
        self.scratch.clear();
        let mut w = Writer::new(&mut self.scratch).with_length_mode(self.mode);
        let root = w.root();
        for _ in 0..messages {
            write_outer(&mut w, root)?;
        }
        w.finish_into(output)
    }
}

/// One-shot form of [`FixtureEncoder::encode_into`].
pub fn write_proto(messages: usize, output: &mut [u8], mode: LengthMode) -> Result<usize, WriterError> {
    FixtureEncoder::new(mode).encode_into(messages, output)
}
