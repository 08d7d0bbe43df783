//! Positioning helpers for putting text and blocks on pages.
//!
//! [wrap_greedy] breaks text into lines for any measuring function, so it
//! works with a real [Font](crate::Font) as well as with fixed metrics in
//! tests. The text helpers in this module tie it to fonts and pages.

mod margins;
mod text;
mod wrap;

pub use margins::*;
pub use text::*;
pub use wrap::*;
