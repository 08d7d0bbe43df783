//! 2D affine transformation matrices, used to place images on a page and to
//! scale existing page content.

use crate::units::*;

/// A PDF transformation matrix `[a b c d e f]`, i.e.
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
/// Points are row vectors, so `x' = a*x + c*y + e` and `y' = b*x + d*y + f`.
///
/// ```
/// use folio::{Transform, Pt};
///
/// // halve, then move 72pt right and up
/// let t = Transform::scale(0.5, 0.5).with_translate(Pt(72.0), Pt(72.0));
/// assert_eq!(t.apply((Pt(100.0), Pt(0.0))), (Pt(122.0), Pt(72.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The transform that leaves every point where it is
    pub fn identity() -> Self {
        Transform::scale(1.0, 1.0)
    }

    /// Create a translation transform
    pub fn translate(x: Pt, y: Pt) -> Self {
        Transform {
            e: *x,
            f: *y,
            ..Transform::identity()
        }
    }

    /// Create a scaling transform about the origin
    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Apply `self` first, then `other`
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Move the result of this transform by `(x, y)`
    pub fn with_translate(self, x: Pt, y: Pt) -> Self {
        self.then(Transform::translate(x, y))
    }

    /// Scale the result of this transform about the origin
    pub fn with_scale(self, sx: f32, sy: f32) -> Self {
        self.then(Transform::scale(sx, sy))
    }

    /// Map a point through the matrix
    pub fn apply(&self, (x, y): (Pt, Pt)) -> (Pt, Pt) {
        (
            Pt(self.a * *x + self.c * *y + self.e),
            Pt(self.b * *x + self.d * *y + self.f),
        )
    }

    /// The matrix that draws a unit square (how images are defined) so that it
    /// covers `frame` completely while keeping `aspect_ratio` (width / height).
    /// Whatever spills over the frame is meant to be clipped away.
    pub fn cover(frame: crate::Rect, aspect_ratio: f32) -> Self {
        let (width, height) = (frame.width(), frame.height());
        let (draw_w, draw_h) = if aspect_ratio > width / height {
            (height * aspect_ratio, height)
        } else {
            (width, width / aspect_ratio)
        };
        let x = frame.x1 - (draw_w - width) / 2.0;
        let y = frame.y1 - (draw_h - height) / 2.0;
        Transform::scale(*draw_w, *draw_h).with_translate(x, y)
    }

    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    #[test]
    fn cover_fills_a_wide_frame_with_a_square_image() {
        let frame = Rect::from_origin(Pt(50.0), Pt(100.0), Pt(220.0), Pt(100.0));
        let t = Transform::cover(frame, 1.0);
        // the square is scaled to the frame width and centred vertically
        assert_eq!((t.a, t.d), (220.0, 220.0));
        assert_eq!(t.apply((Pt(0.0), Pt(0.0))), (Pt(50.0), Pt(40.0)));
        assert_eq!(t.apply((Pt(1.0), Pt(1.0))), (Pt(270.0), Pt(260.0)));
    }

    #[test]
    fn cover_fills_a_tall_frame_with_a_wide_image() {
        let frame = Rect::from_origin(Pt(0.0), Pt(0.0), Pt(70.0), Pt(70.0));
        let t = Transform::cover(frame, 2.0);
        assert_eq!((t.a, t.d), (140.0, 70.0));
        assert_eq!(t.e, -35.0);
    }

    #[test]
    fn chained_operations_apply_in_order() {
        let t = Transform::translate(Pt(10.0), Pt(0.0)).with_scale(2.0, 3.0);
        assert_eq!(t.apply((Pt(1.0), Pt(1.0))), (Pt(22.0), Pt(3.0)));
        assert_eq!(Transform::default().apply((Pt(4.0), Pt(5.0))), (Pt(4.0), Pt(5.0)));
    }
}
