//! PNG and JPEG export.

use crate::backend::RasterBackend;
use crate::color::{Background, Color};
use crate::composite::{composite, flatten};
use crate::error::EncodeError;
use crate::raster::RasterImage;

use super::{ExportFormat, OutputArtifact};

/// JPEG quality on the 1-100 scale (0.9 in canvas terms).
pub const JPEG_QUALITY: u8 = 90;

/// Background used when a format without alpha is asked for a transparent one.
pub(crate) const OPAQUE_FALLBACK: Color = Color::WHITE;

/// Flattens onto `background` (if any) and encodes losslessly.
pub fn encode_png<B: RasterBackend>(
    image: &RasterImage,
    background: Background,
    backend: &B,
) -> Result<OutputArtifact, EncodeError> {
    let flattened = composite(image, background);
    let bytes = backend.encode_png(&flattened)?;
    Ok(OutputArtifact::new(bytes, ExportFormat::Png))
}

/// Flattens onto `background`, or white when transparent, and encodes at
/// [`JPEG_QUALITY`].
pub fn encode_jpeg<B: RasterBackend>(
    image: &RasterImage,
    background: Background,
    backend: &B,
) -> Result<OutputArtifact, EncodeError> {
    let bytes = jpeg_bytes(image, background, backend)?;
    Ok(OutputArtifact::new(bytes, ExportFormat::Jpeg))
}

/// Opaque JPEG bytes for `image` over `background`.
pub(crate) fn jpeg_bytes<B: RasterBackend>(
    image: &RasterImage,
    background: Background,
    backend: &B,
) -> Result<Vec<u8>, EncodeError> {
    let flattened = flatten(image, background.color().unwrap_or(OPAQUE_FALLBACK));
    backend.encode_jpeg(&flattened, JPEG_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SoftwareBackend;

    #[test]
    fn png_keeps_alpha_when_transparent() {
        let img = RasterImage::filled(2, 2, [0, 0, 0, 0]);
        let artifact = encode_png(&img, Background::Transparent, &SoftwareBackend).unwrap();
        assert_eq!(artifact.mime_type(), "image/png");

        let decoded = SoftwareBackend.decode_bitmap(artifact.bytes()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn png_flattens_solid_background() {
        let img = RasterImage::filled(2, 2, [0, 0, 0, 0]);
        let background = Background::Solid(Color::new(0x11, 0x22, 0x33));
        let artifact = encode_png(&img, background, &SoftwareBackend).unwrap();

        let decoded = SoftwareBackend.decode_bitmap(artifact.bytes()).unwrap();
        assert_eq!(decoded.pixel(1, 1), Some([0x11, 0x22, 0x33, 255]));
    }

    #[test]
    fn jpeg_defaults_to_white_behind_transparency() {
        let img = RasterImage::filled(8, 8, [0, 0, 0, 0]);
        let artifact = encode_jpeg(&img, Background::Transparent, &SoftwareBackend).unwrap();
        assert_eq!(artifact.mime_type(), "image/jpeg");

        let decoded = SoftwareBackend.decode_bitmap(artifact.bytes()).unwrap();
        let [r, g, b, a] = decoded.pixel(4, 4).unwrap();
        assert_eq!(a, 255);
        assert!(r > 250 && g > 250 && b > 250, "expected white, got {r},{g},{b}");
    }
}
