//! Mapping from normalized model space to an external viewport.
//!
//! Boxes are first scaled to model input pixels, then pushed through a
//! caller-supplied 2x3 affine transform. The mapped box is the axis-aligned
//! bound of the four transformed corners.

use crate::candidate::Detection;
use crate::geometry::Rect;
use crate::util::{DetGridError, DetGridResult};

/// 2x3 affine transform `p' = [a b; c d] p + [tx; ty]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self::scale_translate(1.0, 1.0, 0.0, 0.0)
    }

    /// Axis-aligned scale followed by a translation.
    pub const fn scale_translate(sx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx,
            ty,
        }
    }

    /// Inverse of a centered, aspect-preserving resize of a `src_width` x
    /// `src_height` image into a `dst_width` x `dst_height` model input.
    ///
    /// Applying the result to model pixel coordinates yields source image
    /// pixel coordinates.
    pub fn letterbox(
        src_width: f32,
        src_height: f32,
        dst_width: f32,
        dst_height: f32,
    ) -> DetGridResult<Self> {
        let sizes = [src_width, src_height, dst_width, dst_height];
        if sizes.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(DetGridError::InvalidConfig(
                "letterbox sizes must be finite and positive",
            ));
        }
        let scale = (dst_width / src_width).min(dst_height / src_height);
        let pad_x = (dst_width - src_width * scale) / 2.0;
        let pad_y = (dst_height - src_height * scale) / 2.0;
        let inv = 1.0 / scale;
        Ok(Self::scale_translate(inv, inv, -pad_x * inv, -pad_y * inv))
    }

    /// Transforms a single point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        )
    }
}

/// Maps detections from normalized model space into viewport space.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateMapper {
    input_width: f32,
    input_height: f32,
    transform: Affine2,
}

impl CoordinateMapper {
    /// Creates a mapper for a model with the given input size.
    pub fn new(input_width: usize, input_height: usize, transform: Affine2) -> Self {
        Self {
            input_width: input_width as f32,
            input_height: input_height as f32,
            transform,
        }
    }

    /// Returns the viewport transform.
    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    /// Scales a normalized rectangle to model input pixels.
    pub fn to_model_pixels(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x * self.input_width,
            rect.y * self.input_height,
            rect.width * self.input_width,
            rect.height * self.input_height,
        )
    }

    /// Maps a normalized rectangle into viewport space.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let px = self.to_model_pixels(rect);
        let corners = [
            self.transform.apply(px.x, px.y),
            self.transform.apply(px.right(), px.y),
            self.transform.apply(px.x, px.bottom()),
            self.transform.apply(px.right(), px.bottom()),
        ];
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Maps a detection, keeping its label and probability.
    pub fn map_detection(&self, det: &Detection) -> Detection {
        Detection::new(det.label, self.map_rect(&det.rect), det.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::{Affine2, CoordinateMapper};
    use crate::geometry::Rect;

    fn assert_rect_close(a: Rect, b: Rect) {
        let tol = 1e-4;
        assert!((a.x - b.x).abs() < tol, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() < tol, "{a:?} vs {b:?}");
        assert!((a.width - b.width).abs() < tol, "{a:?} vs {b:?}");
        assert!((a.height - b.height).abs() < tol, "{a:?} vs {b:?}");
    }

    #[test]
    fn identity_scales_to_model_pixels() {
        let mapper = CoordinateMapper::new(640, 480, Affine2::identity());
        let mapped = mapper.map_rect(&Rect::new(0.25, 0.5, 0.5, 0.25));
        assert_rect_close(mapped, Rect::new(160.0, 240.0, 320.0, 120.0));
    }

    #[test]
    fn letterbox_undoes_padding() {
        // 1280x720 letterboxed into 640x640: scale 0.5, 140 px vertical padding.
        let tf = Affine2::letterbox(1280.0, 720.0, 640.0, 640.0).unwrap();
        let mapper = CoordinateMapper::new(640, 640, tf);
        let model = Rect::new(0.0, 140.0 / 640.0, 1.0, 360.0 / 640.0);
        assert_rect_close(mapper.map_rect(&model), Rect::new(0.0, 0.0, 1280.0, 720.0));
    }

    #[test]
    fn letterbox_rejects_zero_sizes() {
        assert!(Affine2::letterbox(0.0, 720.0, 640.0, 640.0).is_err());
        assert!(Affine2::letterbox(1280.0, 720.0, 640.0, f32::NAN).is_err());
    }

    #[test]
    fn mirrored_transform_keeps_positive_size() {
        let flip = Affine2 {
            a: -1.0,
            tx: 100.0,
            ..Affine2::identity()
        };
        let mapper = CoordinateMapper::new(100, 100, flip);
        let mapped = mapper.map_rect(&Rect::new(0.1, 0.1, 0.2, 0.2));
        assert_rect_close(mapped, Rect::new(70.0, 10.0, 20.0, 20.0));
    }
}
