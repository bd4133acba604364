//! CSS-style filter chains.
//!
//! The black and white logo previews are produced by the browser filters
//! `brightness(0) saturate(100%)` and `... invert(1)`. [`FilterChain`]
//! evaluates the same functions on a [`RasterImage`] so exports can follow
//! the preview path without a browser.

use std::fmt;
use std::str::FromStr;

use crate::error::FilterParseError;
use crate::raster::RasterImage;

// ============================================================================
// Filter
// ============================================================================

/// One filter function. Amounts are fractions (`100%` is `1.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Multiplies every channel by the amount.
    Brightness(f32),
    /// Scales saturation; `0` is grayscale, `1` is unchanged.
    Saturate(f32),
    /// Mixes each channel with its inverse; `1` fully inverts.
    Invert(f32),
}

impl Filter {
    fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            Self::Brightness(amount) => [r * amount, g * amount, b * amount],
            Self::Saturate(s) => [
                (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
                (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
                (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
            ],
            Self::Invert(amount) => {
                let inv = |c: f32| amount * (1.0 - c) + (1.0 - amount) * c;
                [inv(r), inv(g), inv(b)]
            }
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Brightness(_) => "brightness",
            Self::Saturate(_) => "saturate",
            Self::Invert(_) => "invert",
        }
    }

    fn amount(&self) -> f32 {
        match *self {
            Self::Brightness(a) | Self::Saturate(a) | Self::Invert(a) => a,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.amount())
    }
}

// ============================================================================
// FilterChain
// ============================================================================

/// An ordered list of filters applied left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// `brightness(0) saturate(100%)`: every visible pixel becomes black.
    pub fn black() -> Self {
        Self::new(vec![Filter::Brightness(0.0), Filter::Saturate(1.0)])
    }

    /// `brightness(0) saturate(100%) invert(1)`: every visible pixel becomes white.
    pub fn white() -> Self {
        Self::new(vec![
            Filter::Brightness(0.0),
            Filter::Saturate(1.0),
            Filter::Invert(1.0),
        ])
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Applies the chain to every pixel with non-zero alpha.
    ///
    /// Fully transparent pixels keep their RGB values, matching
    /// [`recolor`](super::recolor). Alpha is never changed.
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        let mut result = image.clone();
        if self.filters.is_empty() {
            return result;
        }

        for pixel in result.as_rgba_mut().pixels_mut() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }

            let start = [r, g, b].map(|c| c as f32 / 255.0);
            let [r, g, b] = self
                .filters
                .iter()
                .fold(start, |rgb, filter| filter.apply(rgb))
                .map(|c| (c * 255.0).round() as u8);
            pixel.0 = [r, g, b, a];
        }

        result
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<String> = self.filters.iter().map(Filter::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

impl FromStr for FilterChain {
    type Err = FilterParseError;

    /// Parses a CSS filter list such as `brightness(0) saturate(100%) invert(1)`.
    ///
    /// `none` and the empty string produce an empty chain.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim();
        if rest.is_empty() || rest.eq_ignore_ascii_case("none") {
            return Ok(Self::default());
        }

        let mut filters = Vec::new();
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| FilterParseError::Malformed(rest.to_string()))?;
            let close = rest
                .find(')')
                .filter(|&close| close > open)
                .ok_or_else(|| FilterParseError::Malformed(rest.to_string()))?;

            let function = rest[..open].trim().to_ascii_lowercase();
            let make: fn(f32) -> Filter = match function.as_str() {
                "brightness" => Filter::Brightness,
                "saturate" => Filter::Saturate,
                "invert" => |amount: f32| Filter::Invert(amount.min(1.0)),
                _ => return Err(FilterParseError::UnknownFunction(function)),
            };
            let filter = make(parse_amount(&function, rest[open + 1..close].trim())?);
            filters.push(filter);
            rest = rest[close + 1..].trim_start();
        }

        Ok(Self::new(filters))
    }
}

/// Parses a number or percentage. An empty argument means `1`.
fn parse_amount(function: &str, raw: &str) -> Result<f32, FilterParseError> {
    let invalid = || FilterParseError::InvalidAmount {
        function: function.to_string(),
        amount: raw.to_string(),
    };

    if raw.is_empty() {
        return Ok(1.0);
    }

    let value = match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().map_err(|_| invalid())? / 100.0,
        None => raw.parse::<f32>().map_err(|_| invalid())?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}
