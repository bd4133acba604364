//! The raster type shared by every pipeline stage.
//!
//! A [`RasterImage`] is a row-major, top-to-bottom grid of interleaved
//! 8-bit RGBA samples. The buffer length is always `width * height * 4`.

use image::{Rgba, RgbaImage};

use crate::error::EncodeError;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of bytes an RGBA8 buffer of this size occupies.
    pub fn rgba_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// [`rgba_len`](Self::rgba_len) in 64-bit arithmetic, so it cannot wrap on 32-bit targets.
    pub fn rgba_bytes(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 4
    }
}

/// An RGBA8 raster.
///
/// Transforms never mutate a raster handed to them; they return a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    data: RgbaImage,
}

impl RasterImage {
    /// Creates a fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: RgbaImage::new(width, height),
        }
    }

    /// Creates a raster where every pixel has the same value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            data: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// Wraps an interleaved RGBA buffer.
    ///
    /// Fails with [`EncodeError::BufferMismatch`] when the buffer length is
    /// not `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, buf: Vec<u8>) -> Result<Self, EncodeError> {
        let expected = SizePx::new(width, height).rgba_len();
        let actual = buf.len();
        if actual != expected {
            return Err(EncodeError::BufferMismatch {
                width,
                height,
                expected,
                actual,
            });
        }

        RgbaImage::from_raw(width, height, buf)
            .map(Self::from_rgba)
            .ok_or(EncodeError::BufferMismatch {
                width,
                height,
                expected,
                actual,
            })
    }

    pub fn from_rgba(data: RgbaImage) -> Self {
        Self { data }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns true if the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.dimensions().is_empty()
    }

    /// Returns the `[r, g, b, a]` value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.data.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// The interleaved RGBA buffer.
    pub fn as_raw(&self) -> &[u8] {
        self.data.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw()
    }

    /// Collects the alpha samples, one per pixel.
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.data.pixels().map(|p| p[3]).collect()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.data
    }

    pub(crate) fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.data
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.data
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(data: RgbaImage) -> Self {
        Self::from_rgba(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        let ok = RasterImage::from_raw(2, 2, vec![0; 16]).unwrap();
        assert_eq!(ok.dimensions(), SizePx::new(2, 2));

        let err = RasterImage::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::BufferMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn zero_sized_raster_is_valid() {
        let img = RasterImage::from_raw(0, 0, Vec::new()).unwrap();
        assert!(img.is_empty());
        assert!(img.as_raw().is_empty());
        assert_eq!(img.pixel(0, 0), None);
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let mut buf = vec![0u8; 2 * 2 * 4];
        // (1, 0) is the second pixel of the first row
        buf[4..8].copy_from_slice(&[1, 2, 3, 4]);
        let img = RasterImage::from_raw(2, 2, buf).unwrap();
        assert_eq!(img.pixel(1, 0), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(0, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn rgba_bytes_does_not_wrap() {
        let size = SizePx::new(u32::MAX, u32::MAX);
        assert_eq!(size.rgba_bytes(), u64::from(u32::MAX) * u64::from(u32::MAX) * 4);
        assert_eq!(SizePx::new(3, 2).rgba_bytes(), 24);
    }

    #[test]
    fn alpha_channel_extracts_fourth_sample() {
        let img = RasterImage::filled(3, 1, [9, 9, 9, 77]);
        assert_eq!(img.alpha_channel(), vec![77, 77, 77]);
    }
}
