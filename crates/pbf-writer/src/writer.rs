//! The single-pass writer.
//!
//! Encoding model:
//!
//! ```text
//! root content ............................................
//!   [tag f=1 LEN][len slot x5][ child content ........ ]
//!                 ^ placeholder ^ content_start        ^ cursor at close
//! ```
//!
//! `open_submessage` writes the tag, reserves the length slot and pushes
//! an [`OpenFrame`]. Fields always go to the innermost open frame, which
//! is the end of the buffer. `close` pops the frame and patches
//! `cursor - content_start` into its slot according to the
//! [`LengthMode`].
//!
//! Every operation validates its frame handle and its capacity before
//! touching the buffer, so an error never leaves a half-written field.

use pbf_core::{tag, varint, zigzag, WireType};
use tracing::{debug, trace};

use crate::buffer::OutputBuffer;
use crate::error::WriterError;
use crate::frame::{Frame, OpenFrame};
use crate::length::{LengthMode, LENGTH_PLACEHOLDER_WIDTH, MAX_SUBMESSAGE_LEN};

/// Streaming encoder for one message tree.
///
/// The root frame is opened by the constructor at the current end of the
/// buffer; no length prefix is written for it.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: OutputBuffer<'a>,
    stack: Vec<OpenFrame>,
    next_id: u32,
    root_start: usize,
    mode: LengthMode,
}

impl<'a> Writer<'a> {
    /// Start encoding at the end of `buf`. The buffer grows as needed.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self::with_buffer(OutputBuffer::new(buf))
    }

    /// Start encoding at the end of `buf`, never letting it grow past
    /// `max_len` bytes in total.
    ///
    /// The limit applies while encoding, so every open sub-message counts
    /// its full [`LENGTH_PLACEHOLDER_WIDTH`]-byte length slot even under
    /// [`LengthMode::Compact`], where the slot later shrinks.
    pub fn with_capacity_limit(buf: &'a mut Vec<u8>, max_len: usize) -> Self {
        Self::with_buffer(OutputBuffer::with_limit(buf, max_len))
    }

    fn with_buffer(buf: OutputBuffer<'a>) -> Self {
        let root_start = buf.len();
        trace!(root_start, "opened root frame");
        Writer {
            buf,
            stack: vec![OpenFrame::root(root_start)],
            next_id: 1,
            root_start,
            mode: LengthMode::default(),
        }
    }

    /// Choose how sub-message lengths are written at close.
    pub fn with_length_mode(mut self, mode: LengthMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn length_mode(&self) -> LengthMode {
        self.mode
    }

    /// Handle of the root frame.
    pub fn root(&self) -> Frame {
        Frame::ROOT
    }

    /// Number of open frames, root included. Zero once the root is closed.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Bytes written since the root was opened.
    pub fn len(&self) -> usize {
        self.buf.len() - self.root_start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `frame` is still open on this writer.
    pub fn is_open(&self, frame: Frame) -> bool {
        self.stack.iter().any(|f| f.id == frame.id())
    }

    // ------------------------------------------------------------------
    // Frame lifecycle
    // ------------------------------------------------------------------

    /// Open a sub-message under `field` of `parent`.
    ///
    /// `parent` must be the innermost open frame.
    pub fn open_submessage(&mut self, parent: Frame, field: u32) -> Result<Frame, WriterError> {
        self.begin_field(parent, field, WireType::Len, LENGTH_PLACEHOLDER_WIDTH)?;

        let placeholder = self.buf.reserve_placeholder();
        let id = self.next_id;
        self.next_id += 1;

        let entry = OpenFrame {
            id,
            field,
            placeholder: Some(placeholder),
            content_start: self.buf.len(),
        };
        self.stack.push(entry);

        trace!(frame = id, field, placeholder, depth = self.stack.len(), "opened sub-message");
        Ok(entry.handle())
    }

    /// Close `frame`.
    ///
    /// For the root this only marks it closed. For a sub-message the
    /// content length is patched into the slot reserved at open time.
    pub fn close(&mut self, frame: Frame) -> Result<(), WriterError> {
        let top = *self.innermost(frame)?;

        let Some(placeholder) = top.placeholder else {
            self.stack.pop();
            trace!("closed root frame");
            return Ok(());
        };

        let len = (self.buf.len() - top.content_start) as u64;
        if len > MAX_SUBMESSAGE_LEN {
            debug!(frame = top.id, field = top.field, len, "sub-message too large");
            return Err(WriterError::SubmessageTooLarge { frame: top.id, len });
        }

        self.stack.pop();
        match self.mode {
            LengthMode::Padded => self.buf.patch_padded(placeholder, len),
            LengthMode::Compact => {
                self.buf.patch_compact(placeholder, len);
            }
        }

        trace!(frame = top.id, field = top.field, len, depth = self.stack.len(), "closed sub-message");
        Ok(())
    }

    /// Run `body` inside a sub-message opened under `field` of `parent`.
    ///
    /// The sub-message, and anything `body` opened inside it and left
    /// open, is closed when `body` returns, whether it succeeded or not.
    /// An error from `body` takes precedence over one from closing.
    pub fn with_submessage<T, F>(&mut self, parent: Frame, field: u32, body: F) -> Result<T, WriterError>
    where
        F: FnOnce(&mut Self, Frame) -> Result<T, WriterError>,
    {
        let child = self.open_submessage(parent, field)?;
        let result = body(self, child);
        let closed = self.close_through(child);
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Close frames from the top of the stack down to and including
    /// `frame`. A no-op when `frame` is no longer open.
    fn close_through(&mut self, frame: Frame) -> Result<(), WriterError> {
        while self.is_open(frame) {
            let top = self.stack[self.stack.len() - 1].handle();
            self.close(top)?;
        }
        Ok(())
    }

    /// Check that every sub-message was closed and return the number of
    /// message bytes written. Closes the root if it is still open.
    pub fn finish(mut self) -> Result<usize, WriterError> {
        self.finalize()?;
        Ok(self.len())
    }

    /// Like [`finish`](Self::finish), then copy the message bytes into
    /// `out`, which must be large enough to hold them.
    pub fn finish_into(mut self, out: &mut [u8]) -> Result<usize, WriterError> {
        self.finalize()?;
        let bytes = self.buf.bytes_from(self.root_start);
        if bytes.len() > out.len() {
            debug!(needed = bytes.len(), available = out.len(), "output slice too small");
            return Err(WriterError::BufferCapacityExceeded {
                needed: bytes.len(),
                available: out.len(),
            });
        }
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    fn finalize(&mut self) -> Result<(), WriterError> {
        let open = self.stack.len().saturating_sub(1);
        if open > 0 {
            debug!(open, "finish with unclosed sub-messages");
            return Err(WriterError::UnclosedFrames { open });
        }
        if !self.stack.is_empty() {
            self.close(Frame::ROOT)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Varint fields
    // ------------------------------------------------------------------

    /// `uint64` / `uint32` / `enum` field.
    pub fn add_varint_field(&mut self, frame: Frame, field: u32, value: u64) -> Result<(), WriterError> {
        self.begin_field(frame, field, WireType::Varint, varint::encoded_len(value))?;
        self.buf.put_varint(value);
        Ok(())
    }

    /// `sint64` field: zigzag, then varint.
    pub fn add_zigzag_field(&mut self, frame: Frame, field: u32, value: i64) -> Result<(), WriterError> {
        self.add_varint_field(frame, field, zigzag::encode(value))
    }

    /// `sint32` field.
    pub fn add_zigzag32_field(&mut self, frame: Frame, field: u32, value: i32) -> Result<(), WriterError> {
        self.add_varint_field(frame, field, u64::from(zigzag::encode32(value)))
    }

    /// `int64` field: two's complement, so negative values take ten bytes.
    pub fn add_int64_field(&mut self, frame: Frame, field: u32, value: i64) -> Result<(), WriterError> {
        self.add_varint_field(frame, field, value as u64)
    }

    /// `int32` field, sign-extended to 64 bits as protobuf requires.
    pub fn add_int32_field(&mut self, frame: Frame, field: u32, value: i32) -> Result<(), WriterError> {
        self.add_varint_field(frame, field, i64::from(value) as u64)
    }

    pub fn add_bool_field(&mut self, frame: Frame, field: u32, value: bool) -> Result<(), WriterError> {
        self.add_varint_field(frame, field, u64::from(value))
    }

    // ------------------------------------------------------------------
    // Fixed-width fields (little-endian)
    // ------------------------------------------------------------------

    pub fn add_fixed64_field(&mut self, frame: Frame, field: u32, value: u64) -> Result<(), WriterError> {
        self.begin_field(frame, field, WireType::Fixed64, 8)?;
        self.buf.put_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn add_fixed32_field(&mut self, frame: Frame, field: u32, value: u32) -> Result<(), WriterError> {
        self.begin_field(frame, field, WireType::Fixed32, 4)?;
        self.buf.put_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn add_sfixed64_field(&mut self, frame: Frame, field: u32, value: i64) -> Result<(), WriterError> {
        self.add_fixed64_field(frame, field, value as u64)
    }

    pub fn add_sfixed32_field(&mut self, frame: Frame, field: u32, value: i32) -> Result<(), WriterError> {
        self.add_fixed32_field(frame, field, value as u32)
    }

    pub fn add_double_field(&mut self, frame: Frame, field: u32, value: f64) -> Result<(), WriterError> {
        self.add_fixed64_field(frame, field, value.to_bits())
    }

    pub fn add_float_field(&mut self, frame: Frame, field: u32, value: f32) -> Result<(), WriterError> {
        self.add_fixed32_field(frame, field, value.to_bits())
    }

    // ------------------------------------------------------------------
    // Length-delimited fields
    // ------------------------------------------------------------------

    /// Raw bytes: tag, varint length, payload. No escaping, no terminator.
    pub fn add_bytes_field(&mut self, frame: Frame, field: u32, data: &[u8]) -> Result<(), WriterError> {
        let len = data.len() as u64;
        self.begin_field(frame, field, WireType::Len, varint::encoded_len(len) + data.len())?;
        self.buf.put_varint(len);
        self.buf.put_slice(data);
        Ok(())
    }

    /// UTF-8 string; encoded exactly like bytes.
    pub fn add_string_field(&mut self, frame: Frame, field: u32, text: &str) -> Result<(), WriterError> {
        self.add_bytes_field(frame, field, text.as_bytes())
    }

    /// Packed repeated varints under one tag.
    ///
    /// The payload length goes through the same reserve-and-patch slot as
    /// a sub-message, so `values` is consumed once and never counted up
    /// front. An empty sequence writes nothing. If the values run out of
    /// capacity the partial field is rolled back.
    pub fn add_packed_varint_field<I>(&mut self, frame: Frame, field: u32, values: I) -> Result<(), WriterError>
    where
        I: IntoIterator<Item = u64>,
    {
        self.innermost(frame)?;
        let tag = tag::encode(field, WireType::Len)?;

        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Ok(());
        }

        let field_start = self.buf.len();
        self.buf.ensure(varint::encoded_len(tag) + LENGTH_PLACEHOLDER_WIDTH)?;
        self.buf.put_varint(tag);
        let placeholder = self.buf.reserve_placeholder();
        let content_start = self.buf.len();

        for value in values {
            if let Err(err) = self.buf.ensure(varint::encoded_len(value)) {
                self.buf.truncate(field_start);
                debug!(field, "packed field rolled back: {}", err);
                return Err(err);
            }
            self.buf.put_varint(value);
        }

        let len = (self.buf.len() - content_start) as u64;
        if len > MAX_SUBMESSAGE_LEN {
            self.buf.truncate(field_start);
            return Err(WriterError::SubmessageTooLarge { frame: frame.id(), len });
        }
        match self.mode {
            LengthMode::Padded => self.buf.patch_padded(placeholder, len),
            LengthMode::Compact => {
                self.buf.patch_compact(placeholder, len);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Validate `frame` and `field`, make room for the tag plus
    /// `body_len` bytes, and write the tag.
    fn begin_field(
        &mut self,
        frame: Frame,
        field: u32,
        wire_type: WireType,
        body_len: usize,
    ) -> Result<(), WriterError> {
        self.innermost(frame)?;
        let tag = tag::encode(field, wire_type).map_err(|err| {
            debug!(frame = frame.id(), field, "rejected field number");
            WriterError::from(err)
        })?;
        self.buf.ensure(varint::encoded_len(tag) + body_len)?;
        self.buf.put_varint(tag);
        Ok(())
    }

    /// The stack entry for `frame`, if it is the innermost open frame.
    fn innermost(&self, frame: Frame) -> Result<&OpenFrame, WriterError> {
        match self.stack.last() {
            Some(top) if top.id == frame.id() => Ok(top),
            top => {
                let err = if frame.id() >= self.next_id {
                    WriterError::UnknownFrame { frame: frame.id() }
                } else if let (Some(top), true) = (top, self.is_open(frame)) {
                    WriterError::FrameOrderViolation {
                        frame: frame.id(),
                        innermost: top.id,
                    }
                } else {
                    WriterError::FrameAlreadyClosed { frame: frame.id() }
                };
                debug!(%frame, "frame check failed: {}", err);
                Err(err)
            }
        }
    }
}
