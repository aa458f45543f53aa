//! Borrowed view over the network's flat output tensor.
//!
//! The tensor is anchor-major: record `i` occupies
//! `[i * record_width, (i + 1) * record_width)` and holds
//! `[dx, dy, dw, dh, objectness, class_score_0 .. class_score_{n-1}]`.

use crate::util::{DetGridError, DetGridResult};

/// Number of leading box and objectness values in every record.
pub const RECORD_HEADER: usize = 5;

/// Record width for a model with `num_classes` classes.
pub const fn record_width(num_classes: usize) -> usize {
    RECORD_HEADER + num_classes
}

/// Borrowed, read-only view of a per-anchor output tensor.
#[derive(Clone, Copy, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    num_classes: usize,
    record_width: usize,
}

impl<'a> TensorView<'a> {
    /// Wraps `data` as records of `5 + num_classes` values.
    ///
    /// Only the record width is checked; the record count is checked against
    /// the anchor grid when a cycle starts.
    pub fn new(data: &'a [f32], num_classes: usize) -> DetGridResult<Self> {
        if num_classes == 0 {
            return Err(DetGridError::InvalidConfig("num_classes must be > 0"));
        }
        let record_width = record_width(num_classes);
        if data.len() % record_width != 0 {
            return Err(DetGridError::RecordMisaligned {
                len: data.len(),
                record_width,
            });
        }
        Ok(Self {
            data,
            num_classes,
            record_width,
        })
    }

    /// Number of classes per record.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Values per record.
    pub fn record_width(&self) -> usize {
        self.record_width
    }

    /// Number of whole records in the view.
    pub fn num_records(&self) -> usize {
        self.data.len() / self.record_width
    }

    /// Backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns record `index`, or `None` past the end.
    pub fn record(&self, index: usize) -> Option<&'a [f32]> {
        let start = index.checked_mul(self.record_width)?;
        let end = start.checked_add(self.record_width)?;
        self.data.get(start..end)
    }

    /// Fails with `BufferTooSmall` when fewer than `num_anchors` records exist.
    pub fn ensure_records(&self, num_anchors: usize) -> DetGridResult<()> {
        if self.num_records() < num_anchors {
            return Err(DetGridError::BufferTooSmall {
                needed: num_anchors * self.record_width,
                got: self.data.len(),
            });
        }
        Ok(())
    }
}
