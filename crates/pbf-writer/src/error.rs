//! Errors raised by the writer.
//!
//! All of these are caller bugs or resource limits, never bad data: every
//! field value has an encoding. A failing call leaves the buffer exactly
//! as it was before the call.

use pbf_core::WireError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterError {
    /// The frame is still open but is not the innermost one.
    #[error("frame #{frame} is not the innermost open frame (innermost is #{innermost})")]
    FrameOrderViolation { frame: u32, innermost: u32 },

    /// The frame was closed earlier and cannot be written to or closed again.
    #[error("frame #{frame} is already closed")]
    FrameAlreadyClosed { frame: u32 },

    /// The handle was never issued by this writer.
    #[error("frame #{frame} was not opened by this writer")]
    UnknownFrame { frame: u32 },

    /// The output has a fixed capacity and the write does not fit.
    #[error("buffer capacity exceeded: need {needed} bytes, {available} available")]
    BufferCapacityExceeded { needed: usize, available: usize },

    /// `finish` was called while sub-messages were still open.
    #[error("{open} sub-message frame(s) still open")]
    UnclosedFrames { open: usize },

    /// Sub-message content does not fit in the reserved length slot.
    #[error("frame #{frame} holds {len} bytes, more than a length placeholder can describe")]
    SubmessageTooLarge { frame: u32, len: u64 },

    #[error(transparent)]
    Wire(#[from] WireError),
}
