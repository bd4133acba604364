//! Pixel transforms that derive logo variants from a source raster.
//!
//! Every transform is a pure function from one [`RasterImage`] to a new one.
//! RGB channels are rewritten; alpha always passes through unchanged.
//!
//! - [`threshold`]: strict two-tone black/white by mean luminance
//! - [`recolor`]: tints the logo with a target color, using luminance as intensity
//! - [`FilterChain`]: the browser filter path used for the black and white variants

mod filter;
mod tone;

pub use filter::{Filter, FilterChain};
pub use tone::{THRESHOLD, recolor, threshold};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ColorParseError;
use crate::raster::RasterImage;

/// Which version of the logo to produce.
///
/// Textual form: `color` (alias `original`), `bw`, `black`, `white`, or a `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Variant {
    /// The source pixels as decoded.
    #[default]
    Original,
    /// Two-tone threshold (light areas white, dark areas black).
    Threshold,
    /// Every visible pixel black.
    Black,
    /// Every visible pixel white.
    White,
    /// Tinted with a custom color.
    Custom(Color),
}

impl Variant {
    /// Short label used in file names.
    pub fn label(&self) -> String {
        match self {
            Self::Original => "color".to_string(),
            Self::Threshold => "bw".to_string(),
            Self::Black => "black".to_string(),
            Self::White => "white".to_string(),
            Self::Custom(color) => format!("custom-{}", &color.to_hex()[1..]),
        }
    }

    /// Produces this variant of `image`.
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        apply_variant(image, *self)
    }
}

/// Produces `variant` of `image`. A zero-sized image yields a zero-sized image.
pub fn apply_variant(image: &RasterImage, variant: Variant) -> RasterImage {
    match variant {
        Variant::Original => image.clone(),
        Variant::Threshold => threshold(image),
        Variant::Black => FilterChain::black().apply(image),
        Variant::White => FilterChain::white().apply(image),
        Variant::Custom(color) => recolor(image, color),
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(color) => color.fmt(f),
            other => f.write_str(&other.label()),
        }
    }
}

impl FromStr for Variant {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "color" | "original" => Ok(Self::Original),
            "bw" | "threshold" => Ok(Self::Threshold),
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            _ => Color::from_hex(trimmed).map(Self::Custom),
        }
    }
}

impl TryFrom<String> for Variant {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        variant.to_string()
    }
}
