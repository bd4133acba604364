//! SVG wrapper export.
//!
//! The raster is embedded as a base64 PNG inside an `<image>` element. A
//! solid background becomes a full-canvas `<rect>` written before the image
//! so the logo paints on top of it.

use base64::{Engine as _, engine::general_purpose};

use crate::backend::RasterBackend;
use crate::color::Background;
use crate::error::EncodeError;
use crate::raster::RasterImage;

use super::{ExportFormat, OutputArtifact};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Wraps `image` in an SVG document sized to the raster.
pub fn encode_svg<B: RasterBackend>(
    image: &RasterImage,
    background: Background,
    backend: &B,
) -> Result<OutputArtifact, EncodeError> {
    let png = backend.encode_png(image)?;
    let markup = svg_document(image.width(), image.height(), &png, background);
    Ok(OutputArtifact::new(markup.into_bytes(), ExportFormat::Svg))
}

fn svg_document(width: u32, height: u32, png: &[u8], background: Background) -> String {
    let payload = general_purpose::STANDARD.encode(png);
    let mut svg = String::with_capacity(payload.len() + 256);

    svg.push_str(&format!(
        r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));

    if let Some(color) = background.color() {
        svg.push_str(&format!(
            r#"<rect width="{width}" height="{height}" fill="{color}"/>"#
        ));
    }

    svg.push_str(&format!(
        r#"<image width="{width}" height="{height}" href="data:image/png;base64,{payload}"/>"#
    ));
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SoftwareBackend;
    use crate::color::Color;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    /// Parses the document and returns (element name, attributes) in order.
    fn elements(svg: &str) -> Vec<(String, Vec<(String, String)>)> {
        let mut reader = Reader::from_str(svg);
        let mut out = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let attrs = e
                        .attributes()
                        .map(|a| {
                            let a = a.expect("well-formed attribute");
                            (
                                String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                                String::from_utf8_lossy(&a.value).into_owned(),
                            )
                        })
                        .collect();
                    out.push((name, attrs));
                }
                Ok(_) => {}
                Err(e) => panic!("malformed SVG: {e}"),
            }
        }
        out
    }

    fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn encode(background: Background) -> String {
        let img = RasterImage::filled(10, 10, [255, 0, 0, 255]);
        let artifact = encode_svg(&img, background, &SoftwareBackend).unwrap();
        assert_eq!(artifact.mime_type(), "image/svg+xml");
        String::from_utf8(artifact.into_bytes()).unwrap()
    }

    #[test]
    fn transparent_background_has_no_rect() {
        let svg = encode(Background::Transparent);
        let els = elements(&svg);

        let names: Vec<&str> = els.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["svg", "image"]);
        assert!(!svg.contains("<rect"));

        let root = &els[0].1;
        assert_eq!(attr(root, "xmlns"), Some(SVG_NS));
        assert_eq!(attr(root, "width"), Some("10"));
        assert_eq!(attr(root, "height"), Some("10"));
    }

    #[test]
    fn solid_background_rect_precedes_image() {
        let svg = encode(Background::Solid(Color::new(0x11, 0x22, 0x33)));
        let els = elements(&svg);

        let names: Vec<&str> = els.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["svg", "rect", "image"]);
        assert_eq!(svg.matches("<rect").count(), 1);
        assert_eq!(attr(&els[1].1, "fill"), Some("#112233"));
    }

    #[test]
    fn embedded_png_decodes_to_source() {
        let img = RasterImage::filled(3, 2, [1, 2, 3, 4]);
        let artifact = encode_svg(&img, Background::Transparent, &SoftwareBackend).unwrap();
        let svg = String::from_utf8(artifact.into_bytes()).unwrap();

        let els = elements(&svg);
        let href = attr(&els[1].1, "href").unwrap();
        let payload = href.strip_prefix("data:image/png;base64,").unwrap();
        let png = general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(SoftwareBackend.decode_bitmap(&png).unwrap(), img);
    }
}
