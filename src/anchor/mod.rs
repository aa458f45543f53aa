//! Anchor grid generation.
//!
//! The network output carries no anchor identifiers: record `i` of the
//! tensor belongs to anchor `i` of this grid purely by position. Anchors are
//! laid out stride by stride in the given stride order, and row-major
//! (`grid_y` outer, `grid_x` inner) within each stride block.

use crate::trace::{trace_event, trace_span};

/// Strides of the three detection heads, in output order.
pub const DEFAULT_STRIDES: [usize; 3] = [8, 16, 32];

/// One grid cell of one detection head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Cell column.
    pub grid_x: usize,
    /// Cell row.
    pub grid_y: usize,
    /// Head stride in input pixels.
    pub stride: usize,
}

/// Fixed, ordered anchor list for a model input size.
#[derive(Clone, Debug)]
pub struct AnchorGrid {
    input_width: usize,
    input_height: usize,
    anchors: Vec<Anchor>,
}

impl AnchorGrid {
    /// Builds the grid for the default strides `{8, 16, 32}`.
    pub fn new(input_width: usize, input_height: usize) -> Self {
        Self::with_strides(input_width, input_height, &DEFAULT_STRIDES)
    }

    /// Builds the grid for an explicit stride order.
    pub fn with_strides(input_width: usize, input_height: usize, strides: &[usize]) -> Self {
        let _span = trace_span!("anchor_grid", width = input_width, height = input_height).entered();
        let anchors = generate_anchors(input_width, input_height, strides);
        trace_event!("anchor_grid_built", anchors = anchors.len());
        Self {
            input_width,
            input_height,
            anchors,
        }
    }

    /// Model input width in pixels.
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Model input height in pixels.
    pub fn input_height(&self) -> usize {
        self.input_height
    }

    /// Number of anchors, equal to the number of tensor records consumed.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns true if the input size is smaller than every stride.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Anchors in tensor order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Returns the anchor for tensor record `index`.
    pub fn get(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }
}

/// Generates anchors for every stride in order.
///
/// Input sizes that do not divide evenly are truncated by integer division,
/// and a zero stride contributes no cells. There is no error path.
pub fn generate_anchors(input_width: usize, input_height: usize, strides: &[usize]) -> Vec<Anchor> {
    let total: usize = strides
        .iter()
        .map(|&s| cells(input_width, s) * cells(input_height, s))
        .sum();
    let mut anchors = Vec::with_capacity(total);
    for &stride in strides {
        let cols = cells(input_width, stride);
        let rows = cells(input_height, stride);
        for grid_y in 0..rows {
            for grid_x in 0..cols {
                anchors.push(Anchor {
                    grid_x,
                    grid_y,
                    stride,
                });
            }
        }
    }
    anchors
}

fn cells(extent: usize, stride: usize) -> usize {
    extent.checked_div(stride).unwrap_or(0)
}
