use crate::colour::Colour;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Colours used throughout the portfolio. Every entry can be overridden
/// individually in the content file with a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Headings and body text
    pub primary: Colour,
    /// Skill tags and the default certificate accent
    pub accent: Colour,
    /// Links and calls to action
    pub cta: Colour,
    /// Header band and image placeholders
    pub soft_green: Colour,
    /// Card backgrounds
    pub card_bg: Colour,
    pub white: Colour,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            primary: Colour::new_rgb_bytes(0x4C, 0x5C, 0x68),
            accent: Colour::new_rgb_bytes(0xB6, 0xA5, 0x8D),
            cta: Colour::new_rgb_bytes(0xC3, 0x70, 0x52),
            soft_green: Colour::new_rgb_bytes(0xB8, 0xCA, 0x93),
            card_bg: Colour::new_rgb_bytes(0xF7, 0xF6, 0xF4),
            white: Colour::new_rgb_bytes(0xFF, 0xFF, 0xFF),
        }
    }
}

/// TrueType files for the two weights, relative to the asset directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl Default for FontPaths {
    fn default() -> Self {
        FontPaths {
            regular: PathBuf::from("fonts/Jost-Regular.ttf"),
            bold: PathBuf::from("fonts/Jost-Bold.ttf"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub palette: Palette,
    pub fonts: FontPaths,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_palette_matches_hex_values() {
        let palette = Palette::default();
        assert_eq!(palette.primary, Colour::from_hex("#4C5C68").unwrap());
        assert_eq!(palette.cta, Colour::from_hex("#C37052").unwrap());
        assert_eq!(palette.card_bg, Colour::from_hex("#F7F6F4").unwrap());
    }

    #[test]
    fn palette_entries_override_individually() {
        let theme: Theme = serde_json::from_str(r##"{ "palette": { "cta": "#000" } }"##).unwrap();
        assert_eq!(theme.palette.cta, Colour::from_hex("#000000").unwrap());
        assert_eq!(theme.palette.accent, Palette::default().accent);
        assert_eq!(theme.fonts, FontPaths::default());
    }

    #[test]
    fn invalid_colours_are_rejected() {
        let result: Result<Theme, _> = serde_json::from_str(r#"{ "palette": { "cta": "orange" } }"#);
        assert!(result.is_err());
    }
}
