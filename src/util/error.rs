//! Error types for detgrid.

use thiserror::Error;

/// Result alias for detgrid operations.
pub type DetGridResult<T> = std::result::Result<T, DetGridError>;

/// Errors surfaced by detector construction and per-cycle input checks.
///
/// Configuration variants are raised by [`crate::Detector::new`] and never
/// from the decode hot path. Tensor variants are raised before any decode
/// work starts, so a cycle either runs to completion or does not start.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetGridError {
    /// A threshold is NaN or outside `[0, 1]`.
    #[error("invalid {name}: {value} (expected a value in [0, 1])")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// A numeric configuration field is out of its valid range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The label list does not cover exactly `num_classes` classes.
    #[error("label count mismatch: {labels} labels for {num_classes} classes")]
    LabelCountMismatch { labels: usize, num_classes: usize },
    /// The label list contains an empty or repeated name.
    #[error("malformed label at index {index}: {reason}")]
    MalformedLabel { index: usize, reason: &'static str },
    /// The output tensor holds fewer values than the anchor grid needs.
    #[error("tensor too small: needed {needed} values, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The output tensor length is not a whole number of records.
    #[error("tensor length {len} is not a multiple of the record width {record_width}")]
    RecordMisaligned { len: usize, record_width: usize },
    /// More candidates passed the threshold than the candidate buffer holds.
    #[error("candidate capacity exceeded: {decoded} decoded, capacity {capacity}")]
    CapacityExceeded { decoded: usize, capacity: usize },
}
