//! Closed vector outlines that can be filled, stroked, or used to clip.

use crate::rect::Rect;
use crate::units::Pt;
use pdf_writer::Content;

/// Control point distance for approximating a quarter circle with one cubic
/// bezier, as a fraction of the radius
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// A rectangle with all four corners rounded by `radius`. The radius is
    /// clamped to half of the shorter side.
    RoundedRect { rect: Rect, radius: Pt },
    Circle { centre: (Pt, Pt), radius: Pt },
}

impl Shape {
    pub fn rounded(rect: Rect, radius: Pt) -> Shape {
        Shape::RoundedRect { rect, radius }
    }

    pub fn circle(centre: (Pt, Pt), radius: Pt) -> Shape {
        Shape::Circle { centre, radius }
    }

    /// The smallest rectangle containing the shape
    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Rect(rect) | Shape::RoundedRect { rect, .. } => rect,
            Shape::Circle { centre, radius } => Rect {
                x1: centre.0 - radius,
                y1: centre.1 - radius,
                x2: centre.0 + radius,
                y2: centre.1 + radius,
            },
        }
    }

    /// Append the outline to the current path of `content`. The caller picks
    /// the painting operator (fill, stroke, clip).
    pub fn append_path(&self, content: &mut Content) {
        match *self {
            Shape::Rect(rect) => {
                content.rect(*rect.x1, *rect.y1, *rect.width(), *rect.height());
            }
            Shape::RoundedRect { rect, radius } => {
                let r = *radius.max(Pt(0.0)).min(rect.width() / 2.0).min(rect.height() / 2.0);
                if r <= 0.0 {
                    content.rect(*rect.x1, *rect.y1, *rect.width(), *rect.height());
                    return;
                }
                let (x1, y1, x2, y2) = (*rect.x1, *rect.y1, *rect.x2, *rect.y2);
                let k = r * KAPPA;

                content.move_to(x1 + r, y1);
                content.line_to(x2 - r, y1);
                content.cubic_to(x2 - r + k, y1, x2, y1 + r - k, x2, y1 + r);
                content.line_to(x2, y2 - r);
                content.cubic_to(x2, y2 - r + k, x2 - r + k, y2, x2 - r, y2);
                content.line_to(x1 + r, y2);
                content.cubic_to(x1 + r - k, y2, x1, y2 - r + k, x1, y2 - r);
                content.line_to(x1, y1 + r);
                content.cubic_to(x1, y1 + r - k, x1 + r - k, y1, x1 + r, y1);
                content.close_path();
            }
            Shape::Circle { centre, radius } => {
                let (cx, cy, r) = (*centre.0, *centre.1, *radius);
                let k = r * KAPPA;

                content.move_to(cx + r, cy);
                content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
                content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
                content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
                content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
                content.close_path();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(shape: Shape) -> String {
        let mut content = Content::new();
        shape.append_path(&mut content);
        String::from_utf8(content.finish().to_vec()).unwrap()
    }

    #[test]
    fn circle_bounds_and_path() {
        let circle = Shape::circle((Pt(90.0), Pt(721.0)), Pt(35.0));
        assert_eq!(
            circle.bounds(),
            Rect {
                x1: Pt(55.0),
                y1: Pt(686.0),
                x2: Pt(125.0),
                y2: Pt(756.0)
            }
        );
        let path = path_of(circle);
        assert_eq!(path.lines().filter(|l| l.ends_with(" c")).count(), 4);
        assert!(path.trim_end().ends_with('h'));
    }

    #[test]
    fn oversized_radius_is_clamped_and_zero_radius_is_a_plain_rect() {
        let rect = Rect::from_origin(Pt(0.0), Pt(0.0), Pt(20.0), Pt(10.0));

        let clamped = path_of(Shape::rounded(rect, Pt(100.0)));
        // radius clamps to 5, so the bottom edge starts at x = 5
        let first: Vec<f32> = clamped
            .lines()
            .next()
            .unwrap()
            .split_whitespace()
            .take(2)
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(first, vec![5.0, 0.0]);

        let square = path_of(Shape::rounded(rect, Pt(0.0)));
        assert_eq!(square.lines().count(), 1);
        assert!(square.trim_end().ends_with("re"));
    }
}
