//! Minimal single-image PDF export.
//!
//! The document is always the same five objects:
//!
//! ```text
//! 1 Catalog ──► 2 Pages ──► 3 Page ──┬──► 4 Image XObject (DCTDecode JPEG)
//!                                    └──► 5 Content stream (q W 0 0 H 0 0 cm /Img1 Do Q)
//! ```
//!
//! The media box is the raster size, one unit per pixel. `lopdf` writes the
//! stream `/Length`s and the cross-reference table from the bytes it emits.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::backend::RasterBackend;
use crate::color::Background;
use crate::error::EncodeError;
use crate::raster::RasterImage;

use super::bitmap::jpeg_bytes;
use super::{ExportFormat, OutputArtifact};

/// Name of the image resource referenced from the content stream.
const IMAGE_NAME: &str = "Img1";

/// Flattens `image` (onto white if transparent), JPEG-compresses it, and
/// wraps it in a one-page PDF.
pub fn encode_pdf<B: RasterBackend>(
    image: &RasterImage,
    background: Background,
    backend: &B,
) -> Result<OutputArtifact, EncodeError> {
    let jpeg = jpeg_bytes(image, background, backend)?;
    let bytes = single_image_pdf(image.width(), image.height(), jpeg)?;
    Ok(OutputArtifact::new(bytes, ExportFormat::Pdf))
}

/// The content stream that paints the image across the whole page.
fn content_stream(width: u32, height: u32) -> Content {
    let (w, h) = (i64::from(width), i64::from(height));
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![w.into(), 0i64.into(), 0i64.into(), h.into(), 0i64.into(), 0i64.into()],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}

/// Builds the PDF bytes around an already encoded JPEG.
pub(crate) fn single_image_pdf(width: u32, height: u32, jpeg: Vec<u8>) -> Result<Vec<u8>, EncodeError> {
    let mut doc = Document::with_version("1.4");

    let catalog_id = doc.new_object_id();
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));
    let content = content_stream(width, height).encode()?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    insert(
        &mut doc,
        page_id,
        dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(i64::from(width)),
                Object::Integer(i64::from(height)),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
            "Contents" => content_id,
        },
    );
    insert(
        &mut doc,
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        },
    );
    insert(
        &mut doc,
        catalog_id,
        dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        },
    );
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

fn insert(doc: &mut Document, id: ObjectId, object: impl Into<Object>) {
    doc.objects.insert(id, object.into());
}
