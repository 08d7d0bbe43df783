//! Portfolio PDF generation on top of a small PDF writing layer, plus a
//! utility to rescale the pages of an existing PDF to A4 width.

mod colour;
pub use colour::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to layout objects (mostly text) on pages
pub mod layout;

mod outline;
pub use outline::*;

mod page;
pub use page::*;

pub mod pagesize;

/// Build a portfolio from its content description
pub mod portfolio;

mod rect;
pub use rect::*;

pub(crate) mod refs;

/// Rescale every page of an existing PDF to a fixed width
pub mod rescale;

mod shape;
pub use shape::*;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
