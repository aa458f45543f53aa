//! Rayon-parallel decode pass (feature-gated).
//!
//! Anchor chunks are distributed over the rayon pool. Each chunk owns one
//! scratch vector, so workers append without locks; the caller merges the
//! vectors in chunk order once `for_each` has joined.

use crate::anchor::Anchor;
use crate::candidate::Detection;
use crate::decode::{decode_range, DecodeParams};
use crate::kernel::ActiveScores;
use crate::tensor::TensorView;
use rayon::prelude::*;

/// Decodes `anchors` chunk-parallel into `scratch`, one vector per chunk.
///
/// `scratch` is resized to the chunk count; surviving vectors keep their
/// allocations across cycles.
pub(crate) fn decode_chunks_par(
    anchors: &[Anchor],
    tensor: &TensorView<'_>,
    params: &DecodeParams,
    chunk_size: usize,
    scratch: &mut Vec<Vec<Detection>>,
) {
    let chunk_size = chunk_size.max(1);
    let num_chunks = anchors.len().div_ceil(chunk_size);
    scratch.resize_with(num_chunks, Vec::new);

    anchors
        .par_chunks(chunk_size)
        .zip(scratch.par_iter_mut())
        .enumerate()
        .for_each(|(chunk_idx, (chunk, local))| {
            local.clear();
            decode_range::<ActiveScores>(chunk, chunk_idx * chunk_size, tensor, params, local);
        });
}

#[cfg(test)]
mod tests {
    use super::decode_chunks_par;
    use crate::anchor::generate_anchors;
    use crate::candidate::Detection;
    use crate::decode::{decode_candidates, DecodeParams};
    use crate::tensor::TensorView;

    #[test]
    fn merged_chunks_match_sequential_order() {
        let anchors = generate_anchors(64, 64, &[8, 16, 32]);
        let mut data = Vec::with_capacity(anchors.len() * 6);
        for i in 0..anchors.len() {
            let score = ((i * 13) % 10) as f32 / 10.0;
            data.extend_from_slice(&[0.5, 0.5, -2.0, -2.0, 1.0, score]);
        }
        let tensor = TensorView::new(&data, 1).unwrap();
        let params = DecodeParams::new(64, 64, 0.45);
        let expected = decode_candidates(&anchors, tensor, params).unwrap();

        // Start with more stale scratch vectors than chunks to check resizing.
        let mut scratch: Vec<Vec<Detection>> = vec![Vec::new(); 64];
        decode_chunks_par(&anchors, &tensor, &params, 5, &mut scratch);
        assert_eq!(scratch.len(), anchors.len().div_ceil(5));
        let merged: Vec<Detection> = scratch.into_iter().flatten().collect();
        assert_eq!(merged, expected);
    }
}
