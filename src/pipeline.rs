//! The single parameterized export pipeline.
//!
//! ```text
//! ImageSource ──► Decoder ──► Transformer ──► Compositor ──► Encoder ──► OutputArtifact
//!                  (async)     (Variant)      (Background)   (ExportFormat)
//! ```
//!
//! Every screen of the editor goes through [`ExportPipeline`] with an
//! [`ExportConfig`] instead of carrying its own copy of the export logic.
//! Each call allocates its own buffers, so overlapping exports never share
//! mutable state.

use crate::backend::{RasterBackend, SoftwareBackend};
use crate::color::Background;
use crate::composite::composite;
use crate::config::ExportConfig;
use crate::decode::{DecodeOptions, Decoder, ImageSource};
use crate::encode::{self, ExportFormat, OutputArtifact};
use crate::error::{DecodeError, EncodeError};
use crate::raster::RasterImage;
use crate::transform::{Variant, apply_variant};

// ============================================================================
// ExportRequest
// ============================================================================

/// A raster to encode, the target format, and the background to apply.
///
/// The request borrows its source; encoding never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub source: &'a RasterImage,
    pub format: ExportFormat,
    pub background: Background,
}

impl<'a> ExportRequest<'a> {
    pub fn new(source: &'a RasterImage, format: ExportFormat, background: Background) -> Self {
        Self {
            source,
            format,
            background,
        }
    }
}

// ============================================================================
// ExportPipeline
// ============================================================================

/// Decode, transform, composite, and encode with one injected backend.
///
/// # Example
///
/// ```
/// use logoshift::{Background, Color, ExportConfig, ExportFormat, ExportPipeline, RasterImage, Variant};
///
/// let pipeline = ExportPipeline::software();
/// let logo = RasterImage::filled(4, 4, [200, 200, 200, 255]);
///
/// let config = ExportConfig::new(Variant::Black, ExportFormat::Png).with_background(true);
/// let artifact = pipeline
///     .export(&logo, &config, Background::Solid(Color::WHITE), "logo")
///     .unwrap();
/// assert_eq!(artifact.filename(), Some("logo_black_with_bg.png"));
/// ```
pub struct ExportPipeline<B> {
    decoder: Decoder<B>,
}

impl ExportPipeline<SoftwareBackend> {
    /// A pipeline on the CPU backend with no upload cap.
    pub fn software() -> Self {
        Self::new(SoftwareBackend, DecodeOptions::default())
    }
}

impl<B: RasterBackend> ExportPipeline<B> {
    pub fn new(backend: B, options: DecodeOptions) -> Self {
        Self {
            decoder: Decoder::new(backend, options),
        }
    }

    /// The decoder, for hosts that decode synchronously.
    pub fn decoder(&self) -> &Decoder<B> {
        &self.decoder
    }

    /// Loads and decodes a source image.
    pub async fn decode(&self, source: ImageSource) -> Result<RasterImage, DecodeError> {
        self.decoder.decode(source).await
    }

    /// Derives `variant` from the source raster.
    pub fn transform(&self, image: &RasterImage, variant: Variant) -> RasterImage {
        apply_variant(image, variant)
    }

    /// What the editor shows for `variant` over `background`.
    pub fn preview(&self, image: &RasterImage, variant: Variant, background: Background) -> RasterImage {
        composite(&apply_variant(image, variant), background)
    }

    /// Encodes an already transformed raster.
    pub fn encode(&self, request: &ExportRequest<'_>) -> Result<OutputArtifact, EncodeError> {
        encode::encode(
            request.source,
            request.format,
            request.background,
            self.decoder.backend(),
        )
    }

    /// Runs transform and encode for `config`, naming the artifact after `stem`.
    ///
    /// `chosen` is the background picked in the editor; it is only applied
    /// when the config includes the background.
    pub fn export(
        &self,
        image: &RasterImage,
        config: &ExportConfig,
        chosen: Background,
        stem: &str,
    ) -> Result<OutputArtifact, EncodeError> {
        let transformed = self.transform(image, config.variant);
        let request = ExportRequest::new(&transformed, config.format, config.background(chosen));

        log::debug!(
            "exporting {} variant as {} ({}x{})",
            config.variant,
            config.format,
            image.width(),
            image.height()
        );

        Ok(self.encode(&request)?.with_filename(config.file_name(stem)))
    }

    /// Decodes `source` and exports it in one call.
    ///
    /// A decode failure is reported as [`EncodeError::Source`].
    pub async fn export_source(
        &self,
        source: ImageSource,
        config: &ExportConfig,
        chosen: Background,
        stem: &str,
    ) -> Result<OutputArtifact, EncodeError> {
        let image = self.decode(source).await?;
        self.export(&image, config, chosen, stem)
    }
}
