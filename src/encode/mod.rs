//! Export encoders.
//!
//! Each encoder takes a raster and a background and returns an
//! [`OutputArtifact`]. Encoders never decide file names; callers attach one
//! with [`OutputArtifact::with_filename`].

mod bitmap;
mod pdf;
mod svg;

pub use bitmap::{JPEG_QUALITY, encode_jpeg, encode_png};
pub use pdf::encode_pdf;
pub use svg::encode_svg;

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::backend::RasterBackend;
use crate::color::Background;
use crate::error::EncodeError;
use crate::raster::RasterImage;

// ============================================================================
// ExportFormat
// ============================================================================

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    #[default]
    Png,
    #[serde(rename = "jpg", alias = "jpeg")]
    #[cfg_attr(feature = "clap", value(name = "jpg", alias = "jpeg"))]
    Jpeg,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Svg, Self::Png, Self::Jpeg, Self::Pdf];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }

    /// Returns true if the format can carry an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Svg | Self::Png)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format `{other}`")),
        }
    }
}

// ============================================================================
// OutputArtifact
// ============================================================================

/// The bytes of one export plus the metadata needed to save it.
///
/// Artifacts are created per export call and are not cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    bytes: Vec<u8>,
    format: ExportFormat,
    filename: Option<String>,
}

impl OutputArtifact {
    pub fn new(bytes: Vec<u8>, format: ExportFormat) -> Self {
        Self {
            bytes,
            format,
            filename: None,
        }
    }

    /// Attaches a caller-chosen file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Encodes the artifact as a base64 `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Encodes `image` as `format` over `background`.
pub fn encode<B: RasterBackend>(
    image: &RasterImage,
    format: ExportFormat,
    background: Background,
    backend: &B,
) -> Result<OutputArtifact, EncodeError> {
    let artifact = match format {
        ExportFormat::Svg => encode_svg(image, background, backend)?,
        ExportFormat::Png => encode_png(image, background, backend)?,
        ExportFormat::Jpeg => encode_jpeg(image, background, backend)?,
        ExportFormat::Pdf => encode_pdf(image, background, backend)?,
    };

    log::debug!(
        "encoded {}x{} raster as {} ({} bytes, background {})",
        image.width(),
        image.height(),
        format,
        artifact.len(),
        background
    );
    Ok(artifact)
}
