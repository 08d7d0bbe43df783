use crate::PDFError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fill or stroke colour, in the DeviceRGB or DeviceGray colour space.
///
/// Colours are usually written as CSS-style hex strings (`#4C5C68` or `#fff`)
/// in portfolio files, which is also how they serialize.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Colour, PDFError> {
        let invalid = || PDFError::InvalidColour(hex.to_string());

        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Colour::new_rgb_bytes(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Colour::new_rgb_bytes(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }

    /// The colour as (r, g, b) bytes, expanding grey to all three channels
    pub fn to_rgb_bytes(self) -> (u8, u8, u8) {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self {
            Colour::RGB { r, g, b } => (byte(r), byte(g), byte(b)),
            Colour::Grey { g } => (byte(g), byte(g), byte(g)),
        }
    }

    /// Set this colour as the non-stroking (fill) colour of a content stream
    pub(crate) fn apply_fill(self, content: &mut pdf_writer::Content) {
        match self {
            Colour::RGB { r, g, b } => {
                content.set_fill_rgb(r, g, b);
            }
            Colour::Grey { g } => {
                content.set_fill_gray(g);
            }
        }
    }

    /// Set this colour as the stroking colour of a content stream
    pub(crate) fn apply_stroke(self, content: &mut pdf_writer::Content) {
        match self {
            Colour::RGB { r, g, b } => {
                content.set_stroke_rgb(r, g, b);
            }
            Colour::Grey { g } => {
                content.set_stroke_gray(g);
            }
        }
    }
}

impl FromStr for Colour {
    type Err = PDFError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = PDFError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> String {
        colour.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb_bytes();
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
}
