//! Page composition: header, numbered thumbnail grid, captions, watermark.
//!
//! [`render_page`] turns one batch of records plus the shared layout geometry
//! into a single RGB canvas. Draw order is the z-order — later steps
//! overpaint earlier ones at the same coordinates:
//!
//! 1. White canvas of the configured page size.
//! 2. Right-aligned `Page N of M` at the top margin.
//! 3. Optional left-aligned header text at the same baseline; the grid
//!    cursor advances past it.
//! 4. The grid, row-major: each image decoded, its stored rotation applied,
//!    resized to fit its cell, centered, and pasted; a two-line caption
//!    (filename, display date) goes directly beneath the pasted thumbnail.
//! 5. Optional grey watermark, right-aligned at the bottom margin.
//!
//! Caption and watermark text use fixed sizes independent of the configured
//! font size. A decode failure inside the grid loop aborts the whole page —
//! unlike catalog scanning, rendering does not skip-and-continue; the export
//! and preview drivers own the recovery.

use crate::catalog::{self, CatalogError};
use crate::fonts::ResolvedFont;
use crate::layout::{self, LayoutGeometry, PageSize};
use crate::text;
use crate::transform;
use crate::types::ImageRecord;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Caption lines under each thumbnail, independent of `font_size`.
pub const CAPTION_FONT_SIZE: f32 = 24.0;

/// Watermark text size, independent of `font_size`.
pub const WATERMARK_FONT_SIZE: f32 = 72.0;

const CAPTION_TOP_GAP: u32 = 6;
const CAPTION_LINE_GAP: u32 = 4;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WATERMARK_GREY: Rgb<u8> = Rgb([128, 128, 128]);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Target encoding for exported pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// File extension for exported pages.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

/// Lossy encoding quality (1–100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// The full set of knobs the engine consumes for one render. Immutable for
/// the duration of a render call; owned by the caller.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Free-form header drawn at the top of every page. Empty = no header.
    pub header_text: String,
    /// Requested font family; resolution falls back per [`crate::fonts`].
    pub font_name: String,
    /// Pixel size for header and page-number text.
    pub font_size: u32,
    /// Overlay text stamped at the bottom of every page. Empty = none.
    pub watermark_text: String,
    pub page: PageSize,
    pub margin: u32,
    pub quality: Quality,
    pub format: OutputFormat,
    /// Output filename pattern; the literal `{number}` becomes the
    /// zero-padded 3-digit page index.
    pub filename_pattern: String,
    /// Whether to draw the capture-date caption line.
    pub include_metadata: bool,
    /// Directory exported pages are written into.
    pub save_folder: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            header_text: String::new(),
            font_name: crate::fonts::DEFAULT_FONT.to_string(),
            font_size: 20,
            watermark_text: String::new(),
            page: layout::DEFAULT_PAGE,
            margin: layout::DEFAULT_MARGIN,
            quality: Quality::default(),
            format: OutputFormat::Jpeg,
            filename_pattern: "contact_sheet_{number}".to_string(),
            include_metadata: true,
            save_folder: PathBuf::new(),
        }
    }
}

/// Compose one page from a batch of records.
///
/// `page_number` is 1-based. Any per-image decode failure propagates and
/// aborts the page.
pub fn render_page(
    batch: &[ImageRecord],
    geometry: &LayoutGeometry,
    config: &RenderConfig,
    font: &ResolvedFont,
    page_number: usize,
    total_pages: usize,
) -> Result<RgbImage, RenderError> {
    let mut canvas = RgbImage::from_pixel(config.page.width, config.page.height, WHITE);
    let margin = config.margin;
    let font_size = config.font_size as f32;

    let mut cursor_y = margin as i32;

    let page_label = format!("Page {page_number} of {total_pages}");
    let label_width = text::text_width(font, font_size, &page_label);
    text::draw_text(
        &mut canvas,
        font,
        font_size,
        BLACK,
        config.page.width as i32 - margin as i32 - label_width as i32,
        cursor_y,
        &page_label,
    );

    if !config.header_text.is_empty() {
        text::draw_text(
            &mut canvas,
            font,
            font_size,
            BLACK,
            margin as i32,
            cursor_y,
            &config.header_text,
        );
        cursor_y += (config.font_size + margin) as i32;
    }

    let grid_top = cursor_y as u32;
    for (index, record) in batch.iter().enumerate() {
        let row = index as u32 / geometry.columns;
        let col = index as u32 % geometry.columns;
        let cell_x = margin + col * (geometry.cell_width + margin);
        let cell_y =
            grid_top + row * (geometry.cell_height + layout::CAPTION_GUTTER + margin);

        let img = catalog::load_image(&record.source_path)?;
        let oriented = transform::rotate_image(&img, record.rotation_degrees);
        let thumb = oriented
            .resize(geometry.cell_width, geometry.cell_height, FilterType::Lanczos3)
            .to_rgb8();

        // Center within the cell, both axes.
        let paste_x = cell_x + (geometry.cell_width - thumb.width()) / 2;
        let paste_y = cell_y + (geometry.cell_height - thumb.height()) / 2;
        image::imageops::overlay(&mut canvas, &thumb, paste_x as i64, paste_y as i64);

        let caption_y = (paste_y + thumb.height() + CAPTION_TOP_GAP) as i32;
        text::draw_text(
            &mut canvas,
            font,
            CAPTION_FONT_SIZE,
            BLACK,
            cell_x as i32,
            caption_y,
            &record.filename,
        );
        if config.include_metadata {
            text::draw_text(
                &mut canvas,
                font,
                CAPTION_FONT_SIZE,
                BLACK,
                cell_x as i32,
                caption_y + (CAPTION_FONT_SIZE as u32 + CAPTION_LINE_GAP) as i32,
                &record.display_date,
            );
        }
    }

    if !config.watermark_text.is_empty() {
        let mark_width = text::text_width(font, WATERMARK_FONT_SIZE, &config.watermark_text);
        let mark_y = config
            .page
            .height
            .saturating_sub(margin + WATERMARK_FONT_SIZE as u32);
        text::draw_text(
            &mut canvas,
            font,
            WATERMARK_FONT_SIZE,
            WATERMARK_GREY,
            config.page.width as i32 - margin as i32 - mark_width as i32,
            mark_y as i32,
            &config.watermark_text,
        );
    }

    Ok(canvas)
}
