//! Detection records, confidence ordering and suppression.

pub(crate) mod nms;

use crate::geometry::Rect;
use std::cmp::Ordering;

/// A decoded box with its class label and confidence.
///
/// Used both for raw candidates and for final detections. `probability` is
/// `objectness * class_score[label]` and is always strictly above the
/// probability threshold that admitted it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Class index into the model's label list.
    pub label: usize,
    /// Box in normalized model input space.
    pub rect: Rect,
    /// Confidence score.
    pub probability: f32,
}

impl Detection {
    pub const fn new(label: usize, rect: Rect, probability: f32) -> Self {
        Self {
            label,
            rect,
            probability,
        }
    }
}

/// Orders detections by descending probability, without a secondary key.
pub fn cmp_probability_desc(a: &Detection, b: &Detection) -> Ordering {
    b.probability.total_cmp(&a.probability)
}

/// Sorts detections by descending probability.
///
/// The sort is stable: equal probabilities keep their decode (anchor, class)
/// order.
pub fn sort_candidates_desc(candidates: &mut [Detection]) {
    candidates.sort_by(cmp_probability_desc);
}

#[cfg(test)]
mod tests {
    use super::{sort_candidates_desc, Detection};
    use crate::geometry::Rect;

    fn det(label: usize, probability: f32) -> Detection {
        Detection::new(label, Rect::new(0.0, 0.0, 0.1, 0.1), probability)
    }

    #[test]
    fn sorts_descending() {
        let mut dets = vec![det(0, 0.4), det(1, 0.9), det(2, 0.6)];
        sort_candidates_desc(&mut dets);
        let probs: Vec<f32> = dets.iter().map(|d| d.probability).collect();
        assert_eq!(probs, vec![0.9, 0.6, 0.4]);
    }

    #[test]
    fn ties_keep_decode_order() {
        let mut dets = vec![det(3, 0.5), det(1, 0.7), det(2, 0.5), det(0, 0.5)];
        sort_candidates_desc(&mut dets);
        let labels: Vec<usize> = dets.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec![1, 3, 2, 0]);
    }
}
