//! Per-class confidence kernels.
//!
//! A kernel turns one record's objectness and class scores into the list of
//! `(label, probability)` pairs that clear the probability threshold.

/// Class scoring for a single anchor record.
pub trait ScoreKernel {
    /// Calls `emit(label, probability)` for every class whose
    /// `objectness * class_scores[label]` is strictly above `threshold`,
    /// in ascending label order.
    fn score_classes<F>(objectness: f32, class_scores: &[f32], threshold: f32, emit: F)
    where
        F: FnMut(usize, f32);
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(not(feature = "simd"))]
pub(crate) use scalar::ScalarScores as ActiveScores;
#[cfg(feature = "simd")]
pub(crate) use simd::SimdScores as ActiveScores;
