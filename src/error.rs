//! Error types for the decode and export stages.
//!
//! Decoding and encoding fail independently: a [`DecodeError`] means the
//! source never became a raster, an [`EncodeError`] means a raster exists but
//! the requested artifact could not be produced. Callers match on the variant
//! to decide what to tell the user; nothing in the pipeline retries.

use std::path::PathBuf;

/// The source could not be turned into a [`RasterImage`](crate::RasterImage).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode raster: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("SVG has no drawable area ({width}x{height})")]
    EmptySvg { width: u32, height: u32 },

    #[error("{width}x{height} raster exceeds the {limit} byte allocation limit")]
    RasterTooLarge { width: u32, height: u32, limit: u64 },

    #[error("source is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[cfg(feature = "http")]
    #[error("failed to fetch image: {0}")]
    Network(#[from] reqwest::Error),
}

/// A raster exists but the requested artifact could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("raster context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    BufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("cannot encode an image with zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("source image could not be decoded: {0}")]
    Source(#[from] DecodeError),

    #[error("raster encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// A textual color did not match `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color `{0}`, expected #RGB or #RRGGBB")]
    InvalidHex(String),

    #[error("invalid background `{0}`, expected `transparent` or a hex color")]
    InvalidBackground(String),
}

/// A filter string could not be parsed into a [`FilterChain`](crate::FilterChain).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("unknown filter function `{0}`")]
    UnknownFunction(String),

    #[error("invalid amount `{amount}` for `{function}`")]
    InvalidAmount { function: String, amount: String },

    #[error("malformed filter list near `{0}`")]
    Malformed(String),
}
