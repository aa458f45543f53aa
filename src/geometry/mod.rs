//! Axis-aligned rectangles and overlap measures.
//!
//! Rectangles are stored as `(x, y, width, height)` with `(x, y)` the
//! top-left corner. Decoded boxes live in normalized model space, where the
//! nominal range is `[0, 1]` but edges are allowed to extend past it.

pub mod mapper;

/// Axis-aligned rectangle in `(x, y, width, height)` form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width; non-positive values give an empty rectangle.
    pub width: f32,
    /// Height; non-positive values give an empty rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from its center and size.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area, clamped at zero for degenerate rectangles.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Area of the overlap with `other`; zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }

    /// Intersection over union with `other`.
    pub fn iou(&self, other: &Rect) -> f32 {
        iou(self, other)
    }
}

/// Intersection over union of two rectangles.
///
/// Disjoint pairs and pairs whose union has no area yield `0.0`, so a
/// zero-area box never suppresses anything.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let inter = a.intersection_area(b);
    if inter <= 0.0 {
        return 0.0;
    }
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    inter / union
}

#[cfg(test)]
mod tests {
    use super::{iou, Rect};

    #[test]
    fn identical_rects_have_unit_iou() {
        let r = Rect::new(0.1, 0.2, 0.3, 0.4);
        assert!((iou(&r, &r) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_and_touching_rects_have_zero_iou() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(2.0, 2.0, 1.0, 1.0);
        let touching = Rect::new(1.0, 0.0, 1.0, 1.0);
        assert_eq!(iou(&a, &b), 0.0);
        assert_eq!(iou(&a, &touching), 0.0);
    }

    #[test]
    fn half_overlap_is_exact() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(0.0, 0.0, 0.5, 1.0);
        assert_eq!(iou(&a, &b), 0.5);
        assert_eq!(b.iou(&a), 0.5);
    }

    #[test]
    fn zero_area_rect_is_never_overlapping() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let point = Rect::new(0.5, 0.5, 0.0, 0.0);
        let line = Rect::new(0.2, 0.2, 0.5, 0.0);
        assert_eq!(iou(&a, &point), 0.0);
        assert_eq!(iou(&line, &a), 0.0);
        assert_eq!(iou(&point, &point), 0.0);
    }

    #[test]
    fn from_center_round_trips_center() {
        let r = Rect::from_center(0.5, 0.25, 0.2, 0.1);
        let (cx, cy) = r.center();
        assert!((cx - 0.5).abs() < 1e-6);
        assert!((cy - 0.25).abs() < 1e-6);
        assert!((r.x - 0.4).abs() < 1e-6);
        assert!((r.y - 0.2).abs() < 1e-6);
    }
}
