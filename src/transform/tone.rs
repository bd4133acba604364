//! Threshold and recolor transforms.

use crate::color::Color;
use crate::raster::RasterImage;

/// Mean channel value above which a pixel becomes white.
pub const THRESHOLD: f64 = 128.0;

/// Unweighted mean of the RGB channels.
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 + g as f64 + b as f64) / 3.0
}

/// Converts every pixel to pure black or pure white.
///
/// A pixel whose channel mean is above [`THRESHOLD`] becomes white, every
/// other pixel becomes black. Alpha is copied unchanged, including on fully
/// transparent pixels.
pub fn threshold(image: &RasterImage) -> RasterImage {
    let mut result = image.clone();

    for pixel in result.as_rgba_mut().pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let value = if luminance(r, g, b) > THRESHOLD { 255 } else { 0 };
        pixel.0 = [value, value, value, a];
    }

    result
}

/// Tints every visible pixel with `target`, scaled by the pixel's luminance.
///
/// Each channel becomes `round(target * mean(r, g, b) / 255)`. Fully
/// transparent pixels are left untouched, RGB included.
pub fn recolor(image: &RasterImage, target: Color) -> RasterImage {
    let mut result = image.clone();
    let [tr, tg, tb] = target.channels();

    for pixel in result.as_rgba_mut().pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }

        let intensity = luminance(r, g, b) / 255.0;
        pixel.0 = [
            scale(tr, intensity),
            scale(tg, intensity),
            scale(tb, intensity),
            a,
        ];
    }

    result
}

fn scale(channel: u8, intensity: f64) -> u8 {
    (channel as f64 * intensity).round().clamp(0.0, 255.0) as u8
}
