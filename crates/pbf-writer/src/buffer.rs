//! Output buffer.
//!
//! Wraps the caller's `Vec<u8>` with an optional hard cap on its total
//! length. Every write is preceded by [`OutputBuffer::ensure`], so a
//! write either fits entirely or leaves the buffer untouched.

use pbf_core::varint;

use crate::error::WriterError;
use crate::length::LENGTH_PLACEHOLDER_WIDTH;

#[derive(Debug)]
pub struct OutputBuffer<'a> {
    bytes: &'a mut Vec<u8>,
    limit: Option<usize>,
}

impl<'a> OutputBuffer<'a> {
    /// Growable buffer with no cap.
    pub fn new(bytes: &'a mut Vec<u8>) -> Self {
        OutputBuffer { bytes, limit: None }
    }

    /// Buffer that may never hold more than `max_len` bytes in total,
    /// counting whatever it held before.
    pub fn with_limit(bytes: &'a mut Vec<u8>, max_len: usize) -> Self {
        OutputBuffer {
            bytes,
            limit: Some(max_len),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes that can still be appended, `None` when uncapped.
    pub fn remaining(&self) -> Option<usize> {
        self.limit.map(|max| max.saturating_sub(self.bytes.len()))
    }

    /// Fail unless `additional` more bytes fit.
    pub fn ensure(&mut self, additional: usize) -> Result<(), WriterError> {
        if let Some(available) = self.remaining() {
            if additional > available {
                return Err(WriterError::BufferCapacityExceeded {
                    needed: additional,
                    available,
                });
            }
        }
        self.bytes.reserve(additional);
        Ok(())
    }

    pub fn put_varint(&mut self, value: u64) {
        varint::encode(value, self.bytes);
    }

    pub fn put_slice(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Append a zeroed length slot and return its offset.
    pub fn reserve_placeholder(&mut self) -> usize {
        let at = self.bytes.len();
        self.bytes.resize(at + LENGTH_PLACEHOLDER_WIDTH, 0);
        at
    }

    /// Fill the slot at `at` with `len` padded to the full slot width.
    pub fn patch_padded(&mut self, at: usize, len: u64) {
        varint::write_padded(len, &mut self.bytes[at..at + LENGTH_PLACEHOLDER_WIDTH]);
    }

    /// Write `len` minimally at `at` and drop the unused slot bytes.
    ///
    /// Returns how many bytes were removed.
    pub fn patch_compact(&mut self, at: usize, len: u64) -> usize {
        let written = varint::write(len, &mut self.bytes[at..at + LENGTH_PLACEHOLDER_WIDTH]);
        if written < LENGTH_PLACEHOLDER_WIDTH {
            self.bytes.drain(at + written..at + LENGTH_PLACEHOLDER_WIDTH);
        }
        LENGTH_PLACEHOLDER_WIDTH - written
    }

    /// Drop everything from `len` on. Used to roll back a field that
    /// could not be completed.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    pub fn bytes_from(&self, start: usize) -> &[u8] {
        &self.bytes[start..]
    }
}
