//! detgrid decodes per-anchor detection tensors into final boxes.
//!
//! The crate covers the post-processing stage of an anchor-free, YOLOX-style
//! detector: a fixed anchor grid over strides `{8, 16, 32}`, a chunked
//! decode pass (parallel with the `rayon` feature), confidence sorting and
//! greedy class-agnostic non-maximum suppression. Running the network and
//! preparing its input are left to the caller.
//!
//! ```
//! use detgrid::{Detector, DetectorConfig};
//!
//! let mut detector = Detector::new(DetectorConfig {
//!     input_width: 8,
//!     input_height: 8,
//!     num_classes: 1,
//!     ..DetectorConfig::default()
//! })
//! .unwrap();
//! // One anchor: [dx, dy, dw, dh, objectness, class_score_0].
//! let dets = detector.detect(&[0.5, 0.5, 0.0, 0.0, 1.0, 0.9]).unwrap();
//! assert_eq!(dets.len(), 1);
//! ```

pub mod anchor;
mod candidate;
pub mod decode;
pub mod detector;
pub mod geometry;
pub mod kernel;
pub mod lowlevel;
pub mod tensor;
mod trace;
pub mod util;

pub use anchor::{Anchor, AnchorGrid, DEFAULT_STRIDES};
pub use candidate::Detection;
pub use detector::{CycleStats, Detector, DetectorConfig, LabelSet, OverflowPolicy};
pub use geometry::mapper::{Affine2, CoordinateMapper};
pub use geometry::{iou, Rect};
pub use tensor::TensorView;
pub use util::{DetGridError, DetGridResult};
