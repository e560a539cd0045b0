//! Multi-page PDF assembly.
//!
//! Each rendered page canvas becomes one PDF page carrying a single
//! full-bleed JPEG image XObject (`DCTDecode`), so the PDF embeds the same
//! bytes a JPEG export would produce. Page boxes are sized in points
//! assuming the canvas pixels are 300 DPI, which maps the default
//! 2550x3300 page onto US Letter (612x792 pt).

use crate::render::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const CANVAS_DPI: f32 = 300.0;
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to encode page image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to build PDF structure: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pixel edge length converted to PDF points at the canvas DPI.
fn px_to_pt(px: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / CANVAS_DPI
}

/// Build an in-memory document with one page per canvas.
pub fn build_document(pages: &[RgbImage], quality: Quality) -> Result<Document, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for canvas in pages {
        let (width, height) = (canvas.width(), canvas.height());
        let jpeg = encode_jpeg(canvas, quality)?;

        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        // The stream already holds compressed JPEG bytes; deflating it again
        // would only slow readers down.
        let image_id = doc.add_object(Stream::new(image_dict, jpeg).with_compression(false));

        let (pt_w, pt_h) = (px_to_pt(width), px_to_pt(height));
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        pt_w.into(),
                        0.into(),
                        0.into(),
                        pt_h.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), pt_w.into(), pt_h.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Assemble all page canvases into a single PDF file at `path`.
pub fn write_pdf(pages: &[RgbImage], quality: Quality, path: &Path) -> Result<(), PdfError> {
    let mut doc = build_document(pages, quality)?;
    doc.save(path).map_err(|source| PdfError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), pages = pages.len(), "wrote pdf");
    Ok(())
}

fn encode_jpeg(canvas: &RgbImage, quality: Quality) -> Result<Vec<u8>, PdfError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
    encoder.encode(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}
