//! Frame-level detector: decode, sort and suppress with reused buffers.
//!
//! A [`Detector`] owns the anchor grid for its input size and two buffers,
//! one for sorted candidates and one for final detections. Both are sized
//! at construction and cleared, not freed, at the start of every cycle. The
//! slices handed out borrow the detector and stay valid until the next cycle.

mod config;

pub use config::{DetectorConfig, LabelSet, OverflowPolicy};

use crate::anchor::AnchorGrid;
use crate::candidate::nms::nms_greedy_into;
use crate::candidate::{sort_candidates_desc, Detection};
use crate::decode::{ChunkedDecoder, DecodeParams};
use crate::tensor::{record_width, TensorView};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{DetGridError, DetGridResult};

/// Counts from the most recent cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Candidates that passed the probability threshold.
    pub decoded: usize,
    /// Lowest-confidence candidates discarded by the capacity limit.
    pub dropped: usize,
    /// Candidates handed to NMS.
    pub candidates: usize,
    /// Final detections kept by NMS.
    pub kept: usize,
}

/// Decode-and-filter stage for one model.
#[derive(Debug)]
pub struct Detector {
    cfg: DetectorConfig,
    grid: AnchorGrid,
    labels: Option<LabelSet>,
    decoder: ChunkedDecoder,
    candidates: Vec<Detection>,
    detections: Vec<Detection>,
    stats: CycleStats,
}

impl Detector {
    /// Validates `cfg` and precomputes the anchor grid.
    pub fn new(cfg: DetectorConfig) -> DetGridResult<Self> {
        cfg.validate()?;
        let grid = AnchorGrid::new(cfg.input_width, cfg.input_height);
        Ok(Self {
            decoder: ChunkedDecoder::new(cfg.decode_chunk_size, cfg.parallel),
            candidates: Vec::with_capacity(cfg.candidate_capacity),
            detections: Vec::with_capacity(cfg.max_detections),
            grid,
            labels: None,
            stats: CycleStats::default(),
            cfg,
        })
    }

    /// Like [`Detector::new`], also checking that `labels` covers every class.
    pub fn with_labels(cfg: DetectorConfig, labels: LabelSet) -> DetGridResult<Self> {
        labels.check_class_count(cfg.num_classes)?;
        let mut detector = Self::new(cfg)?;
        detector.labels = Some(labels);
        Ok(detector)
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the precomputed anchor grid.
    pub fn anchor_grid(&self) -> &AnchorGrid {
        &self.grid
    }

    /// Returns the class names, if any were supplied.
    pub fn labels(&self) -> Option<&LabelSet> {
        self.labels.as_ref()
    }

    /// Looks up the class name of a detection, when labels were supplied.
    pub fn label_name(&self, det: &Detection) -> Option<&str> {
        self.labels.as_ref()?.name(det.label)
    }

    /// Values per anchor record, `5 + num_classes`.
    pub fn record_width(&self) -> usize {
        record_width(self.cfg.num_classes)
    }

    /// Tensor length the model is expected to produce.
    pub fn expected_tensor_len(&self) -> usize {
        self.grid.len() * self.record_width()
    }

    /// Runs one full cycle and returns the final detections.
    ///
    /// Detections are ordered by descending probability and number at most
    /// `max_detections`. Errors are only raised before decoding starts, or
    /// for [`OverflowPolicy::Error`]; in both cases the previous results are
    /// already cleared.
    pub fn detect(&mut self, tensor: &[f32]) -> DetGridResult<&[Detection]> {
        let _span = trace_span!("detect", anchors = self.grid.len()).entered();
        self.prepare_candidates(tensor)?;

        {
            let _span = trace_span!("nms", candidates = self.candidates.len()).entered();
            nms_greedy_into(
                &self.candidates,
                self.cfg.nms_threshold,
                self.cfg.max_detections,
                &mut self.detections,
            );
        }
        self.stats.kept = self.detections.len();
        trace_event!("detections", kept = self.stats.kept);
        Ok(&self.detections)
    }

    /// Runs decode, sort and the capacity limit without NMS.
    ///
    /// Returns the sorted candidates; final detections are left empty.
    pub fn decode_only(&mut self, tensor: &[f32]) -> DetGridResult<&[Detection]> {
        let _span = trace_span!("decode_only", anchors = self.grid.len()).entered();
        self.prepare_candidates(tensor)?;
        Ok(&self.candidates)
    }

    /// Final detections of the last successful cycle.
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Sorted candidates of the last cycle.
    pub fn candidates(&self) -> &[Detection] {
        &self.candidates
    }

    /// Counts from the most recent cycle, reset when a cycle fails.
    pub fn last_stats(&self) -> CycleStats {
        self.stats
    }

    fn prepare_candidates(&mut self, tensor: &[f32]) -> DetGridResult<()> {
        self.candidates.clear();
        self.detections.clear();
        self.stats = CycleStats::default();

        let view = TensorView::new(tensor, self.cfg.num_classes)?;
        let params = DecodeParams::new(
            self.cfg.input_width,
            self.cfg.input_height,
            self.cfg.prob_threshold,
        );
        self.decoder
            .decode_into(self.grid.anchors(), view, params, &mut self.candidates)?;
        self.stats.decoded = self.candidates.len();

        sort_candidates_desc(&mut self.candidates);

        let capacity = self.cfg.candidate_capacity;
        if self.candidates.len() > capacity {
            let decoded = self.candidates.len();
            match self.cfg.overflow {
                OverflowPolicy::DropLowest => {
                    self.candidates.truncate(capacity);
                    self.stats.dropped = decoded - capacity;
                    trace_warn!(
                        "candidate_overflow",
                        decoded = decoded,
                        capacity = capacity,
                        dropped = self.stats.dropped
                    );
                }
                OverflowPolicy::Error => {
                    self.candidates.clear();
                    return Err(DetGridError::CapacityExceeded { decoded, capacity });
                }
            }
        }
        self.stats.candidates = self.candidates.len();
        Ok(())
    }
}
