//! SIMD class-score kernel using the `wide` crate.
//!
//! Eight class scores are scaled by objectness per step with `f32x8`. Each
//! lane performs the same single multiply as the scalar kernel, so results
//! are bit-identical to [`super::scalar::ScalarScores`].

use crate::kernel::ScoreKernel;
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Vectorized class scoring.
pub struct SimdScores;

impl ScoreKernel for SimdScores {
    #[inline]
    fn score_classes<F>(objectness: f32, class_scores: &[f32], threshold: f32, mut emit: F)
    where
        F: FnMut(usize, f32),
    {
        let obj = f32x8::splat(objectness);
        let simd_end = class_scores.len() / LANES * LANES;

        let mut base = 0;
        while base < simd_end {
            let probs = (obj * load_f32x8(&class_scores[base..])).to_array();
            for (lane, &probability) in probs.iter().enumerate() {
                if probability > threshold {
                    emit(base + lane, probability);
                }
            }
            base += LANES;
        }

        for (offset, &score) in class_scores[simd_end..].iter().enumerate() {
            let probability = objectness * score;
            if probability > threshold {
                emit(simd_end + offset, probability);
            }
        }
    }
}
