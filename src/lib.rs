//! logoshift: logo variant and export pipeline
//!
//! This crate decodes an uploaded logo, derives black, white, two-tone, or
//! custom-color variants from it, composites them over a background, and
//! exports the result as SVG, PNG, JPEG, or a single-page PDF.
//!
//! # Example
//!
//! ```
//! use logoshift::{Background, Color, ExportConfig, ExportFormat, ExportPipeline, RasterImage, Variant};
//!
//! let pipeline = ExportPipeline::software();
//! let logo = RasterImage::filled(16, 16, [40, 40, 40, 255]);
//!
//! // What the editor shows
//! let preview = pipeline.preview(&logo, Variant::White, Background::Solid(Color::BLACK));
//! assert_eq!(preview.pixel(0, 0), Some([255, 255, 255, 255]));
//!
//! // What the user downloads
//! let config = ExportConfig::new(Variant::Threshold, ExportFormat::Pdf);
//! let artifact = pipeline.export(&logo, &config, Background::Transparent, "logo").unwrap();
//! assert_eq!(artifact.filename(), Some("logo_bw_transparent.pdf"));
//! assert!(artifact.bytes().starts_with(b"%PDF-1.4"));
//! ```
//!
//! # Serializable Configs
//!
//! For host/wasm communication, use [`ExportConfig`]:
//!
//! ```
//! use logoshift::ExportConfig;
//!
//! let config = ExportConfig::from_json(r##"{"variant":"#ff6600","includeBackground":true,"format":"jpg"}"##).unwrap();
//! assert_eq!(config.file_name("logo"), "logo_custom-ff6600_with_bg.jpg");
//! ```

mod backend;
mod color;
mod composite;
mod config;
mod decode;
mod encode;
mod error;
mod pipeline;
mod raster;
mod transform;

#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::LogoEditor;

pub use backend::{MAX_RASTER_BYTES, RasterBackend, SoftwareBackend};
pub use color::{Background, Color, normalize_hex};
pub use composite::{alpha_blend, composite, flatten};
pub use config::ExportConfig;
pub use decode::{DEFAULT_UPLOAD_LIMIT, DataUrl, DecodeOptions, Decoder, ImageSource, SourceKind};
pub use encode::{
    ExportFormat, JPEG_QUALITY, OutputArtifact, encode, encode_jpeg, encode_pdf, encode_png, encode_svg,
};
pub use error::{ColorParseError, DecodeError, EncodeError, FilterParseError};
pub use pipeline::{ExportPipeline, ExportRequest};
pub use raster::{RasterImage, SizePx};
pub use transform::{Filter, FilterChain, THRESHOLD, Variant, apply_variant, recolor, threshold};
