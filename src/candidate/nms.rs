//! Greedy, class-agnostic non-maximum suppression.

use crate::candidate::Detection;
use crate::geometry::iou;

/// Runs greedy NMS over probability-sorted candidates into `out`.
///
/// `out` is cleared first. A candidate is kept unless its IoU with an
/// already kept detection is strictly greater than `iou_threshold`; labels
/// are ignored, so a box of one class can suppress a box of another.
/// Selection stops once `max_detections` boxes are kept.
pub fn nms_greedy_into(
    sorted: &[Detection],
    iou_threshold: f32,
    max_detections: usize,
    out: &mut Vec<Detection>,
) {
    out.clear();
    if max_detections == 0 {
        return;
    }

    'outer: for candidate in sorted {
        if out.len() == max_detections {
            break;
        }
        for kept in out.iter() {
            if iou(&candidate.rect, &kept.rect) > iou_threshold {
                continue 'outer;
            }
        }
        out.push(*candidate);
    }
}

/// Allocating variant of [`nms_greedy_into`].
pub fn nms_greedy(sorted: &[Detection], iou_threshold: f32, max_detections: usize) -> Vec<Detection> {
    let mut out = Vec::with_capacity(max_detections.min(sorted.len()));
    nms_greedy_into(sorted, iou_threshold, max_detections, &mut out);
    out
}
