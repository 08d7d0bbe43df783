use crate::font::Font;
use crate::units::Pt;

/// The offset from a top edge down to the baseline of the first line of text
/// set in `font` at `size`. Negative, so it can be added to a y-coordinate.
pub fn baseline_offset(font: &Font, size: Pt) -> Pt {
    -font.ascent(size)
}

/// Width of a single line of text
pub fn width_of_text(text: &str, font: &Font, size: Pt) -> Pt {
    font.width_of(text, size)
}
