//! Scalar reference kernel.

use crate::kernel::ScoreKernel;

/// One multiply and compare per class.
pub struct ScalarScores;

impl ScoreKernel for ScalarScores {
    #[inline]
    fn score_classes<F>(objectness: f32, class_scores: &[f32], threshold: f32, mut emit: F)
    where
        F: FnMut(usize, f32),
    {
        for (label, &score) in class_scores.iter().enumerate() {
            let probability = objectness * score;
            if probability > threshold {
                emit(label, probability);
            }
        }
    }
}
