//! Frame handles.
//!
//! A [`Frame`] names one message scope (the root or a sub-message). It is
//! a plain copyable id: the writer keeps the real state in a stack of
//! [`OpenFrame`] entries and checks every handle against it, so a stale
//! or out-of-order handle is reported instead of corrupting the output.

use std::fmt;

/// Handle to a message scope opened on a [`Writer`](crate::Writer).
///
/// Only meaningful for the writer that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    id: u32,
}

impl Frame {
    pub(crate) const ROOT: Frame = Frame { id: 0 };

    pub(crate) fn new(id: u32) -> Self {
        Frame { id }
    }

    /// Per-writer id, in opening order. The root is `0`.
    pub fn id(self) -> u32 {
        self.id
    }

    pub fn is_root(self) -> bool {
        self.id == 0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root frame")
        } else {
            write!(f, "frame #{}", self.id)
        }
    }
}

/// Stack entry for a frame that has not been closed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenFrame {
    pub id: u32,

    /// Field number the sub-message was opened under (0 for the root).
    pub field: u32,

    /// Offset of the reserved length slot; `None` for the root.
    pub placeholder: Option<usize>,

    /// Offset of the first content byte.
    pub content_start: usize,
}

impl OpenFrame {
    pub fn root(content_start: usize) -> Self {
        OpenFrame {
            id: Frame::ROOT.id,
            field: 0,
            placeholder: None,
            content_start,
        }
    }

    pub fn handle(&self) -> Frame {
        Frame::new(self.id)
    }
}
