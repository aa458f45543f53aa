//! Low-level building blocks for custom post-processing pipelines.
//!
//! These expose each stage of [`crate::Detector`] separately, for callers
//! that schedule decoding themselves or inspect intermediate results. Most
//! users should prefer the `Detector` API.

pub use crate::anchor::generate_anchors;
pub use crate::candidate::nms::{nms_greedy, nms_greedy_into};
pub use crate::candidate::{cmp_probability_desc, sort_candidates_desc};
pub use crate::decode::{decode_candidates, ChunkedDecoder, DecodeParams, NormalizedBox, PixelBox};
pub use crate::geometry::iou;
pub use crate::kernel::scalar::ScalarScores;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::SimdScores;
pub use crate::kernel::ScoreKernel;
pub use crate::tensor::{record_width, RECORD_HEADER};
