use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;

/// Space kept clear around the edge of a page. Nothing stops content from
/// being drawn inside the margins; they define the frame that flowing
/// content is placed in and the `ArtBox` of each written page.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Clockwise from the top, in the same order as CSS margins
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    pub fn empty() -> Margins {
        Margins::all(Pt(0.0))
    }

    /// The region of a page of the given size that lies inside the margins
    pub fn frame(&self, size: PageSize) -> Rect {
        let (width, height) = size;
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: width - self.right,
            y2: height - self.top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn frame_is_page_minus_margins() {
        let frame = Margins::all(Pt(50.0)).frame(pagesize::A4);
        assert_eq!(frame.x1, Pt(50.0));
        assert_eq!(frame.y1, Pt(50.0));
        assert_eq!(frame.x2, pagesize::A4.0 - Pt(50.0));
        assert_eq!(frame.y2, pagesize::A4.1 - Pt(50.0));
    }

    #[test]
    fn symmetric_margins() {
        let margins = Margins::symmetric(Pt(10.0), Pt(20.0));
        assert_eq!(margins, Margins::trbl(Pt(10.0), Pt(20.0), Pt(10.0), Pt(20.0)));
    }
}
