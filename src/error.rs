use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// The portfolio description is not valid JSON or does not match the schema
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    /// [lopdf] failed to read or modify an existing PDF
    Lopdf(#[from] lopdf::Error),

    #[error("{0:?} is not a valid hex colour (expected #RRGGBB or #RGB)")]
    InvalidColour(String),

    #[error("invalid value for `{field}`: {reason}")]
    /// A portfolio field is present but unusable, e.g. blank text or a malformed URL
    InvalidContent { field: String, reason: String },

    #[error("font has no glyph for {0:?} and no replacement glyph")]
    MissingGlyph(char),

    #[error("page {0} has no usable media box")]
    MissingMediaBox(u32),

    #[error("cannot rescale: {0}")]
    InvalidScale(String),

    #[error("page {0} is referenced but missing from the document")]
    PageMissing(usize),
}
