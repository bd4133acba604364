//! Background compositing.
//!
//! Flattening paints an opaque canvas of the background color and draws the
//! logo over it with source-over blending. The result is fully opaque, so a
//! second pass with the same background changes nothing.

use image::Rgba;

use crate::color::{Background, Color};
use crate::raster::RasterImage;

/// Places `image` over `background`.
///
/// A transparent background returns a pixel-identical copy. A solid
/// background returns an opaque raster of the same size.
pub fn composite(image: &RasterImage, background: Background) -> RasterImage {
    match background {
        Background::Transparent => image.clone(),
        Background::Solid(color) => flatten(image, color),
    }
}

/// Draws `image` onto an opaque canvas of `color`.
pub fn flatten(image: &RasterImage, color: Color) -> RasterImage {
    let backdrop = Rgba([color.r, color.g, color.b, 255]);
    let mut result = image.clone();

    for pixel in result.as_rgba_mut().pixels_mut() {
        *pixel = alpha_blend(*pixel, backdrop);
    }

    result
}

/// Alpha blends two RGBA pixels (source over destination).
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transparent_background_is_passthrough() {
        let mut img = RasterImage::filled(3, 3, [10, 20, 30, 0]);
        img.as_rgba_mut().put_pixel(1, 1, Rgba([1, 2, 3, 128]));
        assert_eq!(composite(&img, Background::Transparent), img);
    }

    #[test]
    fn opaque_source_occludes_background() {
        let red = RasterImage::filled(4, 4, [255, 0, 0, 255]);
        let out = composite(&red, Background::Solid(Color::new(0, 0, 255)));
        assert!(out.as_rgba().pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn transparent_pixels_take_background() {
        let img = RasterImage::filled(2, 1, [200, 200, 200, 0]);
        let out = flatten(&img, Color::new(0x11, 0x22, 0x33));
        assert_eq!(out.pixel(0, 0), Some([0x11, 0x22, 0x33, 255]));
    }

    #[test]
    fn half_transparent_blends() {
        let img = RasterImage::filled(1, 1, [255, 255, 255, 128]);
        let out = flatten(&img, Color::BLACK);
        // 255 * 128/255 = 128
        assert_eq!(out.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn zero_sized_composite() {
        let img = RasterImage::new(0, 0);
        assert!(composite(&img, Background::Solid(Color::WHITE)).is_empty());
    }

    #[test]
    fn alpha_blend_over_transparent_destination() {
        let out = alpha_blend(Rgba([10, 20, 30, 0]), Rgba([0, 0, 0, 0]));
        assert_eq!(out.0, [0, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn flatten_is_idempotent(
            buf in proptest::collection::vec(any::<u8>(), 4 * 9),
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
        ) {
            let img = RasterImage::from_raw(3, 3, buf).unwrap();
            let background = Background::Solid(Color::new(r, g, b));
            let once = composite(&img, background);
            prop_assert!(once.alpha_channel().iter().all(|&a| a == 255));
            prop_assert_eq!(composite(&once, background), once);
        }
    }
}
