//! Proposal decoding from raw records to candidate detections.
//!
//! Geometry is reconstructed in model pixel space first ([`PixelBox`]) and
//! normalized by the input size as a separate step. Anchors whose normalized
//! center falls outside `[0, 1] x [0, 1]` are skipped before any class is
//! scored; box edges are never clipped.

#[cfg(feature = "rayon")]
pub(crate) mod parallel;

use crate::anchor::Anchor;
use crate::candidate::Detection;
use crate::geometry::Rect;
use crate::kernel::{ActiveScores, ScoreKernel};
use crate::tensor::{TensorView, RECORD_HEADER};
use crate::trace::{trace_event, trace_span};
use crate::util::math::in_unit_range;
use crate::util::DetGridResult;

/// Per-cycle decode parameters.
#[derive(Clone, Copy, Debug)]
pub struct DecodeParams {
    /// Model input width in pixels.
    pub input_width: f32,
    /// Model input height in pixels.
    pub input_height: f32,
    /// Candidates need `probability > prob_threshold`.
    pub prob_threshold: f32,
}

impl DecodeParams {
    /// Builds parameters for a model input of `input_width` x `input_height` pixels.
    pub fn new(input_width: usize, input_height: usize, prob_threshold: f32) -> Self {
        Self {
            input_width: input_width as f32,
            input_height: input_height as f32,
            prob_threshold,
        }
    }
}

/// Box center and size in model input pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelBox {
    /// Reconstructs the pixel-space box from a record's `[dx, dy, dw, dh]`.
    #[inline]
    pub fn from_record(record: &[f32], anchor: &Anchor) -> Self {
        let stride = anchor.stride as f32;
        Self {
            cx: (record[0] + anchor.grid_x as f32) * stride,
            cy: (record[1] + anchor.grid_y as f32) * stride,
            width: record[2].exp() * stride,
            height: record[3].exp() * stride,
        }
    }

    /// Divides by the input size, giving center and size in `[0, 1]` units.
    #[inline]
    pub fn normalize(&self, input_width: f32, input_height: f32) -> NormalizedBox {
        NormalizedBox {
            cx: self.cx / input_width,
            cy: self.cy / input_height,
            width: self.width / input_width,
            height: self.height / input_height,
        }
    }
}

/// Box center and size in normalized model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedBox {
    /// True when the center lies in `[0, 1] x [0, 1]`, bounds included.
    #[inline]
    pub fn center_in_bounds(&self) -> bool {
        in_unit_range(self.cx) && in_unit_range(self.cy)
    }

    /// Top-left anchored rectangle.
    #[inline]
    pub fn to_rect(&self) -> Rect {
        Rect::from_center(self.cx, self.cy, self.width, self.height)
    }
}

/// Decodes one anchor's record, appending accepted candidates to `out`.
#[inline]
pub(crate) fn decode_anchor<K: ScoreKernel>(
    anchor: &Anchor,
    record: &[f32],
    params: &DecodeParams,
    out: &mut Vec<Detection>,
) {
    let norm = PixelBox::from_record(record, anchor)
        .normalize(params.input_width, params.input_height);
    if !norm.center_in_bounds() {
        return;
    }
    let rect = norm.to_rect();
    let objectness = record[4];
    K::score_classes(
        objectness,
        &record[RECORD_HEADER..],
        params.prob_threshold,
        |label, probability| out.push(Detection::new(label, rect, probability)),
    );
}

/// Decodes a contiguous run of anchors starting at tensor record `first`.
///
/// Callers must have checked that the tensor holds every record in range.
pub(crate) fn decode_range<K: ScoreKernel>(
    anchors: &[Anchor],
    first: usize,
    tensor: &TensorView<'_>,
    params: &DecodeParams,
    out: &mut Vec<Detection>,
) {
    for (offset, anchor) in anchors.iter().enumerate() {
        if let Some(record) = tensor.record(first + offset) {
            decode_anchor::<K>(anchor, record, params, out);
        }
    }
}

/// Decodes every anchor sequentially into a new, unsorted candidate list.
pub fn decode_candidates(
    anchors: &[Anchor],
    tensor: TensorView<'_>,
    params: DecodeParams,
) -> DetGridResult<Vec<Detection>> {
    tensor.ensure_records(anchors.len())?;
    let mut out = Vec::new();
    decode_range::<ActiveScores>(anchors, 0, &tensor, &params, &mut out);
    Ok(out)
}

/// Reusable decode pass over the anchor grid.
///
/// Work is split into fixed-size anchor chunks. With the `rayon` feature and
/// `parallel` set, chunks are decoded concurrently into per-chunk scratch
/// buffers that are merged in chunk order after the join, which gives the
/// same sequence as the sequential pass. Scratch buffers are cleared, not
/// freed, between cycles.
#[derive(Debug)]
pub struct ChunkedDecoder {
    chunk_size: usize,
    parallel: bool,
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    scratch: Vec<Vec<Detection>>,
}

impl ChunkedDecoder {
    /// `chunk_size` of zero is treated as one.
    pub fn new(chunk_size: usize, parallel: bool) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            parallel,
            scratch: Vec::new(),
        }
    }

    /// Anchors per work unit.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// True when decoding actually runs on the rayon pool.
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "rayon") && self.parallel
    }

    /// Decodes all anchors into `out`, replacing its contents.
    pub fn decode_into(
        &mut self,
        anchors: &[Anchor],
        tensor: TensorView<'_>,
        params: DecodeParams,
        out: &mut Vec<Detection>,
    ) -> DetGridResult<()> {
        tensor.ensure_records(anchors.len())?;
        let _span = trace_span!(
            "decode",
            anchors = anchors.len(),
            parallel = self.is_parallel()
        )
        .entered();

        out.clear();
        if !self.decode_parallel(anchors, &tensor, &params, out) {
            for (chunk_idx, chunk) in anchors.chunks(self.chunk_size).enumerate() {
                decode_range::<ActiveScores>(
                    chunk,
                    chunk_idx * self.chunk_size,
                    &tensor,
                    &params,
                    out,
                );
            }
        }
        trace_event!("decoded", candidates = out.len());
        Ok(())
    }

    /// Runs the rayon pass when enabled; returns false to fall back.
    #[cfg(feature = "rayon")]
    fn decode_parallel(
        &mut self,
        anchors: &[Anchor],
        tensor: &TensorView<'_>,
        params: &DecodeParams,
        out: &mut Vec<Detection>,
    ) -> bool {
        if !self.parallel {
            return false;
        }
        parallel::decode_chunks_par(anchors, tensor, params, self.chunk_size, &mut self.scratch);
        for local in &self.scratch {
            out.extend_from_slice(local);
        }
        true
    }

    #[cfg(not(feature = "rayon"))]
    fn decode_parallel(
        &mut self,
        _anchors: &[Anchor],
        _tensor: &TensorView<'_>,
        _params: &DecodeParams,
        _out: &mut Vec<Detection>,
    ) -> bool {
        false
    }
}
