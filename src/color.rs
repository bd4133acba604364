//! Colors and background specifications.
//!
//! Colors travel through the UI as `#RGB` / `#RRGGBB` strings. Internally
//! they are plain 24-bit RGB, and the canonical text form is always the
//! lowercase six digit one so repeated normalization is stable.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

// ============================================================================
// Color
// ============================================================================

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (either case).
    ///
    /// The leading `#` is required; the shorthand form expands each digit,
    /// so `#abc` becomes `#aabbcc`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let invalid = || ColorParseError::InvalidHex(hex.to_string());

        let digits = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let rgb: Srgb<u8> = digits.parse().map_err(|_| invalid())?;
        Ok(rgb.into())
    }

    /// Returns the canonical `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns the channels as a `[r, g, b]` array.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Normalizes a `#RGB` / `#RRGGBB` string to lowercase `#rrggbb`.
pub fn normalize_hex(hex: &str) -> Result<String, ColorParseError> {
    Color::from_hex(hex).map(|c| c.to_hex())
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ============================================================================
// Background
// ============================================================================

/// What sits behind the logo when it is flattened or exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    /// No fill; the raster's own alpha is kept.
    #[default]
    Transparent,
    /// An opaque canvas painted before the logo.
    Solid(Color),
}

impl Background {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Returns the fill color, if any.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Transparent => None,
            Self::Solid(color) => Some(*color),
        }
    }
}

impl From<Color> for Background {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str("transparent"),
            Self::Solid(color) => color.fmt(f),
        }
    }
}

impl FromStr for Background {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        Color::from_hex(trimmed)
            .map(Self::Solid)
            .map_err(|_| ColorParseError::InvalidBackground(s.to_string()))
    }
}

impl TryFrom<String> for Background {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_six_digit_hex() {
        let color = Color::from_hex("#112233").unwrap();
        assert_eq!(color, Color::new(0x11, 0x22, 0x33));
        assert_eq!(color.to_hex(), "#112233");
    }

    #[test]
    fn shorthand_expands_to_six_digits() {
        assert_eq!(normalize_hex("#abc").unwrap(), "#aabbcc");
        assert_eq!(normalize_hex("#ABC").unwrap(), "#aabbcc");
    }

    #[test]
    fn normalization_is_stable() {
        let once = normalize_hex("#AbC").unwrap();
        let twice = normalize_hex(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(normalize_hex("#FFFFFF").unwrap(), "#ffffff");
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["112233", "#12", "#12345", "#1234567", "#ggg", "", "#"] {
            assert!(
                matches!(Color::from_hex(bad), Err(ColorParseError::InvalidHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn palette_roundtrip() {
        let color = Color::new(1, 2, 3);
        let rgb: Srgb<u8> = color.into();
        assert_eq!(Color::from(rgb), color);
    }

    #[test]
    fn background_parsing() {
        assert_eq!("transparent".parse::<Background>().unwrap(), Background::Transparent);
        assert_eq!("Transparent".parse::<Background>().unwrap(), Background::Transparent);
        assert_eq!(
            "#fff".parse::<Background>().unwrap(),
            Background::Solid(Color::WHITE)
        );
        assert!(matches!(
            "blue".parse::<Background>(),
            Err(ColorParseError::InvalidBackground(_))
        ));
    }

    #[test]
    fn background_serializes_as_string() {
        let json = serde_json::to_string(&Background::Solid(Color::new(0x11, 0x22, 0x33))).unwrap();
        assert_eq!(json, "\"#112233\"");
        let json = serde_json::to_string(&Background::Transparent).unwrap();
        assert_eq!(json, "\"transparent\"");

        let restored: Background = serde_json::from_str("\"#ABC\"").unwrap();
        assert_eq!(restored, Background::Solid(Color::new(0xaa, 0xbb, 0xcc)));
        assert!(serde_json::from_str::<Background>("\"nope\"").is_err());
    }
}
