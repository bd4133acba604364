//! Raster context providers.
//!
//! The pipeline never reaches for a global canvas. Every stage that needs
//! codec or rasterizer support receives a [`RasterBackend`], so the same
//! pipeline runs in a browser host, a CLI, or a headless test.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{DecodeError, EncodeError};
use crate::raster::{RasterImage, SizePx};

/// Largest RGBA buffer an SVG may rasterize to. Matches the default
/// allocation limit `image` applies to bitmap decoding (512 MiB).
pub const MAX_RASTER_BYTES: u64 = 512 * 1024 * 1024;

/// Codec and rasterization capabilities required by the pipeline.
pub trait RasterBackend {
    /// Decodes PNG or JPEG bytes.
    fn decode_bitmap(&self, bytes: &[u8]) -> Result<RasterImage, DecodeError>;

    /// Renders SVG markup at its intrinsic size.
    fn rasterize_svg(&self, svg: &str) -> Result<RasterImage, DecodeError>;

    /// Encodes a raster losslessly as PNG, alpha included.
    fn encode_png(&self, image: &RasterImage) -> Result<Vec<u8>, EncodeError>;

    /// Encodes a raster as baseline JPEG. Alpha is discarded.
    ///
    /// `quality` is on the 1-100 scale.
    fn encode_jpeg(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

impl<B: RasterBackend + ?Sized> RasterBackend for &B {
    fn decode_bitmap(&self, bytes: &[u8]) -> Result<RasterImage, DecodeError> {
        (**self).decode_bitmap(bytes)
    }

    fn rasterize_svg(&self, svg: &str) -> Result<RasterImage, DecodeError> {
        (**self).rasterize_svg(svg)
    }

    fn encode_png(&self, image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
        (**self).encode_png(image)
    }

    fn encode_jpeg(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        (**self).encode_jpeg(image, quality)
    }
}

// ============================================================================
// SoftwareBackend
// ============================================================================

/// CPU implementation backed by the `image` codecs and `resvg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareBackend;

impl RasterBackend for SoftwareBackend {
    fn decode_bitmap(&self, bytes: &[u8]) -> Result<RasterImage, DecodeError> {
        let format = image::guess_format(bytes)?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(DecodeError::UnsupportedFormat(format!("{format:?}")));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)?;
        Ok(RasterImage::from_rgba(decoded.to_rgba8()))
    }

    fn rasterize_svg(&self, svg: &str) -> Result<RasterImage, DecodeError> {
        let opts = Options::default();
        let tree = Tree::from_str(svg, &opts)?;

        let svg_size = tree.size();
        let width = svg_size.width().ceil() as u32;
        let height = svg_size.height().ceil() as u32;

        let bytes = SizePx::new(width, height).rgba_bytes();
        if bytes > MAX_RASTER_BYTES {
            return Err(DecodeError::RasterTooLarge {
                width,
                height,
                limit: MAX_RASTER_BYTES,
            });
        }

        let mut pixmap =
            Pixmap::new(width, height).ok_or(DecodeError::EmptySvg { width, height })?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        Ok(RasterImage::from_rgba(pixmap_to_rgba_image(&pixmap)))
    }

    fn encode_png(&self, image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
        ensure_drawable(image)?;

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image.as_rgba().clone()).write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    fn encode_jpeg(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        ensure_drawable(image)?;

        let rgb = DynamicImage::ImageRgba8(image.as_rgba().clone()).to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&rgb)?;
        Ok(out)
    }
}

fn ensure_drawable(image: &RasterImage) -> Result<(), EncodeError> {
    if image.is_empty() {
        return Err(EncodeError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia stores premultiplied alpha
        dst.0 = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a_f = a as f32 / 255.0;
    [
        (r as f32 / a_f).round().min(255.0) as u8,
        (g as f32 / a_f).round().min(255.0) as u8,
        (b as f32 / a_f).round().min(255.0) as u8,
        a,
    ]
}

// ============================================================================
// Tests
// ============================================================================
