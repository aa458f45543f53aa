//! Detector configuration and label lists.

use crate::util::math::check_unit_threshold;
use crate::util::{DetGridError, DetGridResult};
use std::collections::HashSet;

/// What to do when more candidates pass the threshold than fit the
/// candidate buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Keep the `candidate_capacity` most confident candidates and count
    /// the rest in [`crate::CycleStats::dropped`].
    #[default]
    DropLowest,
    /// Fail the cycle with [`DetGridError::CapacityExceeded`].
    Error,
}

/// Configuration for [`crate::Detector`].
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Model input width in pixels.
    pub input_width: usize,
    /// Model input height in pixels.
    pub input_height: usize,
    /// Number of classes per tensor record.
    pub num_classes: usize,
    /// Per-class acceptance threshold in `[0, 1]`, compared with `>`.
    pub prob_threshold: f32,
    /// IoU suppression threshold in `[0, 1]`, compared with `>`.
    pub nms_threshold: f32,
    /// Candidates retained between decode and NMS.
    pub candidate_capacity: usize,
    /// Maximum number of final detections.
    pub max_detections: usize,
    /// Decode on the rayon pool when the `rayon` feature is enabled.
    pub parallel: bool,
    /// Anchors per scheduling chunk.
    pub decode_chunk_size: usize,
    /// Candidate buffer overflow handling.
    pub overflow: OverflowPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            input_width: 640,
            input_height: 640,
            num_classes: 80,
            prob_threshold: 0.3,
            nms_threshold: 0.45,
            candidate_capacity: 100,
            max_detections: 100,
            parallel: true,
            decode_chunk_size: 256,
            overflow: OverflowPolicy::DropLowest,
        }
    }
}

impl DetectorConfig {
    /// Checks every field range. Fields are independent of each other.
    pub fn validate(&self) -> DetGridResult<()> {
        if self.input_width == 0 || self.input_height == 0 {
            return Err(DetGridError::InvalidConfig("input size must be > 0"));
        }
        if self.num_classes == 0 {
            return Err(DetGridError::InvalidConfig("num_classes must be > 0"));
        }
        check_unit_threshold("prob_threshold", self.prob_threshold)?;
        check_unit_threshold("nms_threshold", self.nms_threshold)?;
        if self.candidate_capacity == 0 {
            return Err(DetGridError::InvalidConfig("candidate_capacity must be > 0"));
        }
        if self.max_detections == 0 {
            return Err(DetGridError::InvalidConfig("max_detections must be > 0"));
        }
        if self.decode_chunk_size == 0 {
            return Err(DetGridError::InvalidConfig("decode_chunk_size must be > 0"));
        }
        Ok(())
    }
}

/// Ordered class names, index `i` naming label `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Validates that names are non-empty after trimming and unique.
    pub fn new<I, S>(names: I) -> DetGridResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DetGridError::MalformedLabel {
                    index,
                    reason: "empty name",
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(DetGridError::MalformedLabel {
                    index,
                    reason: "duplicate name",
                });
            }
        }
        Ok(Self { names })
    }

    /// Number of class names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set holds no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of `label`, if it is in range.
    pub fn name(&self, label: usize) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    /// All names in label order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fails unless the set names exactly `num_classes` classes.
    pub fn check_class_count(&self, num_classes: usize) -> DetGridResult<()> {
        if self.names.len() != num_classes {
            return Err(DetGridError::LabelCountMismatch {
                labels: self.names.len(),
                num_classes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectorConfig, LabelSet};
    use crate::util::DetGridError;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn thresholds_must_be_unit_range() {
        let cfg = DetectorConfig {
            prob_threshold: -0.1,
            ..DetectorConfig::default()
        };
        assert_eq!(
            cfg.validate().unwrap_err(),
            DetGridError::InvalidThreshold {
                name: "prob_threshold",
                value: -0.1,
            }
        );

        let cfg = DetectorConfig {
            nms_threshold: f32::NAN,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(DetGridError::InvalidThreshold {
                name: "nms_threshold",
                ..
            })
        ));
    }

    #[test]
    fn zero_capacities_are_rejected() {
        for cfg in [
            DetectorConfig {
                candidate_capacity: 0,
                ..DetectorConfig::default()
            },
            DetectorConfig {
                max_detections: 0,
                ..DetectorConfig::default()
            },
            DetectorConfig {
                decode_chunk_size: 0,
                ..DetectorConfig::default()
            },
            DetectorConfig {
                num_classes: 0,
                ..DetectorConfig::default()
            },
        ] {
            assert!(matches!(
                cfg.validate(),
                Err(DetGridError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn labels_reject_blank_and_duplicate_names() {
        assert_eq!(
            LabelSet::new(["cat", " "]).unwrap_err(),
            DetGridError::MalformedLabel {
                index: 1,
                reason: "empty name",
            }
        );
        assert_eq!(
            LabelSet::new(["cat", "dog", "cat"]).unwrap_err(),
            DetGridError::MalformedLabel {
                index: 2,
                reason: "duplicate name",
            }
        );
    }

    #[test]
    fn labels_check_class_count() {
        let labels = LabelSet::new(["cat", "dog"]).unwrap();
        assert_eq!(labels.name(1), Some("dog"));
        assert_eq!(labels.name(2), None);
        assert!(labels.check_class_count(2).is_ok());
        assert_eq!(
            labels.check_class_count(3).unwrap_err(),
            DetGridError::LabelCountMismatch {
                labels: 2,
                num_classes: 3,
            }
        );
    }
}
