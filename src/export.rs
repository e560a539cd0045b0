//! Pagination and export: sort, batch, render, encode to disk.
//!
//! [`create_output`] is the top-level entry the shell calls. It sorts the
//! catalog ascending by the pre-formatted display-date string (a plain
//! lexical sort, so the `Unknown Date` sentinel orders by string comparison
//! against real dates), computes the layout once, partitions the sorted
//! records into consecutive full batches, renders every page, and encodes:
//!
//! - JPEG/PNG: one numbered file per page, named from the filename pattern.
//! - PDF: all pages in a single document.
//!
//! The shell-facing contract is a plain success boolean. Every failure —
//! sort, layout, render, encode, filesystem — is caught here, logged, and
//! reported as `false`; partial output may exist on disk.

use crate::catalog::Catalog;
use crate::fonts;
use crate::layout::compute_layout;
use crate::pdf::{self, PdfError};
use crate::render::{self, OutputFormat, Quality, RenderConfig, RenderError};
use crate::types::ImageRecord;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Catalog is empty, nothing to export")]
    EmptyCatalog,
}

/// Pages needed for `image_count` records at `images_per_page` per page.
pub fn get_total_pages(image_count: usize, images_per_page: u32) -> usize {
    image_count.div_ceil(images_per_page.max(1) as usize)
}

/// Substitute the page number into the filename pattern and append the
/// format extension.
///
/// `{number}` becomes a zero-padded 3-digit 1-based index. A pattern with
/// no placeholder names every page identically, so later pages overwrite
/// earlier ones; the quirk is kept for compatibility and warned about.
pub fn page_filename(pattern: &str, page_number: usize, format: OutputFormat) -> String {
    let stem = if pattern.contains("{number}") {
        pattern.replace("{number}", &format!("{page_number:03}"))
    } else {
        if page_number == 1 {
            warn!(
                pattern,
                "filename pattern has no {{number}} placeholder, pages will overwrite each other"
            );
        }
        pattern.to_string()
    };
    format!("{stem}.{}", format.extension())
}

/// PNG compression effort derived from the configured quality.
///
/// Higher quality maps to lower compression effort; the inverse numeric
/// relationship `(100 - quality) / 10` is part of the output contract.
pub fn png_compression_level(quality: Quality) -> u8 {
    (100 - quality.value()) / 10
}

fn png_compression_type(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Sort records ascending by display-date string. Stable, so records with
/// equal dates (including the sentinel) keep their catalog order.
pub fn sort_by_display_date(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| a.display_date.cmp(&b.display_date));
}

/// Partition sorted records into consecutive batches of `images_per_page`.
pub fn partition_batches(records: &[ImageRecord], images_per_page: u32) -> Vec<&[ImageRecord]> {
    records.chunks(images_per_page.max(1) as usize).collect()
}

/// Render the full catalog and write every page to the configured folder.
///
/// Shell-facing wrapper: all errors are logged here and collapsed into a
/// boolean.
pub fn create_output(catalog: &Catalog, config: &RenderConfig) -> bool {
    match export_catalog(catalog, config) {
        Ok(pages) => {
            info!(pages, folder = %config.save_folder.display(), "export complete");
            true
        }
        Err(e) => {
            error!(error = %e, "export failed");
            false
        }
    }
}

/// The fallible core of [`create_output`]. Returns the number of pages
/// written.
pub fn export_catalog(catalog: &Catalog, config: &RenderConfig) -> Result<usize, ExportError> {
    if catalog.is_empty() {
        return Err(ExportError::EmptyCatalog);
    }

    let mut records = catalog.records().to_vec();
    sort_by_display_date(&mut records);

    let geometry = compute_layout(config.page, config.margin, records.len());
    let total_pages = get_total_pages(records.len(), geometry.images_per_page as u32);
    let font = fonts::resolve_font(&config.font_name);

    let mut pages = Vec::with_capacity(total_pages);
    for (index, batch) in partition_batches(&records, geometry.images_per_page as u32)
        .into_iter()
        .enumerate()
    {
        pages.push(render::render_page(
            batch,
            &geometry,
            config,
            &font,
            index + 1,
            total_pages,
        )?);
    }

    std::fs::create_dir_all(&config.save_folder)?;
    match config.format {
        OutputFormat::Pdf => {
            let path = config
                .save_folder
                .join(page_filename(&config.filename_pattern, 1, config.format));
            pdf::write_pdf(&pages, config.quality, &path)?;
        }
        OutputFormat::Jpeg | OutputFormat::Png => {
            for (index, page) in pages.iter().enumerate() {
                let path = config.save_folder.join(page_filename(
                    &config.filename_pattern,
                    index + 1,
                    config.format,
                ));
                save_page(page, &path, config)?;
            }
        }
    }
    Ok(pages.len())
}

fn save_page(page: &RgbImage, path: &PathBuf, config: &RenderConfig) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encode = |writer| -> Result<(), image::ImageError> {
        match config.format {
            OutputFormat::Jpeg => {
                let mut encoder = JpegEncoder::new_with_quality(writer, config.quality.value());
                encoder.encode(
                    page.as_raw(),
                    page.width(),
                    page.height(),
                    ExtendedColorType::Rgb8,
                )
            }
            OutputFormat::Png => {
                let level = png_compression_level(config.quality);
                let encoder = PngEncoder::new_with_quality(
                    writer,
                    png_compression_type(level),
                    PngFilterType::Adaptive,
                );
                encoder.write_image(
                    page.as_raw(),
                    page.width(),
                    page.height(),
                    ExtendedColorType::Rgb8,
                )
            }
            OutputFormat::Pdf => unreachable!("pdf pages are written as one document"),
        }
    };
    encode(writer).map_err(|source| ExportError::Encode {
        path: path.clone(),
        source,
    })
}
