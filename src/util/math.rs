//! Numeric helpers shared by config validation and decoding.

use crate::util::{DetGridError, DetGridResult};

/// Returns true when `value` lies in `[0, 1]`, bounds included.
///
/// NaN is never in range.
#[inline]
pub(crate) fn in_unit_range(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Validates a threshold-style parameter against `[0, 1]`.
pub(crate) fn check_unit_threshold(name: &'static str, value: f32) -> DetGridResult<()> {
    if in_unit_range(value) {
        Ok(())
    } else {
        Err(DetGridError::InvalidThreshold { name, value })
    }
}
