//! Image-only PDF assembly.
//!
//! Each page becomes a single DCT-encoded image XObject drawn across the
//! whole MediaBox. The MediaBox is the pixel size converted back to points
//! at the render DPI, so the new document prints at the original physical
//! size.

use crate::error::DocFitError;
use crate::geometry::pixels_to_points;
use crate::pipeline::encode::encode_jpeg;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// Build a multi-page PDF with one JPEG image per page.
///
/// # Errors
/// [`DocFitError::EmptyDocument`] when `pages` is empty.
pub fn images_to_pdf(pages: &[RgbImage], dpi: u32, quality: u8) -> Result<Vec<u8>, DocFitError> {
    if pages.is_empty() {
        return Err(DocFitError::EmptyDocument);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for (idx, page) in pages.iter().enumerate() {
        let (width, height) = page.dimensions();
        let jpeg = encode_jpeg(page, quality, None)?;
        debug!(
            "Page {}: {}x{} px → {} bytes JPEG (q{})",
            idx + 1,
            width,
            height,
            jpeg.len(),
            quality
        );

        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false);
        let image_id = doc.add_object(image);

        let w_pt = pixels_to_points(width, dpi);
        let h_pt = pixels_to_points(height, dpi);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![w_pt.into(), 0.into(), 0.into(), h_pt.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|e| DocFitError::PdfWriteFailed(format!("page {} content: {e}", idx + 1)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), w_pt.into(), h_pt.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DocFitError::PdfWriteFailed(e.to_string()))?;
    Ok(out)
}
