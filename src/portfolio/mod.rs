//! The portfolio generator: content model, theme, layout and rendering.
//!
//! ```no_run
//! use folio::portfolio::{generate, Portfolio};
//! use std::path::Path;
//!
//! let portfolio = Portfolio::sample()?;
//! let pages = generate(&portfolio, Path::new("."), Path::new("Portfolio.pdf"))?;
//! println!("{pages} pages");
//! # Ok::<(), folio::PDFError>(())
//! ```

pub mod layout;
mod model;
mod render;
mod theme;

pub use model::*;
pub use render::*;
pub use theme::*;
