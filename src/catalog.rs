//! Catalog building: folder scanning, per-image records, thumbnail cache.
//!
//! The catalog is the ordered list of [`ImageRecord`]s currently loaded. It
//! is owned here — other components receive a slice, or an explicit mutable
//! slice when they need to update records (rotation). Nothing mutates catalog
//! state ambiently.
//!
//! ## Scanning
//!
//! [`Catalog::scan_folder`] clears any prior catalog and walks one directory
//! (non-recursive), keeping files with a supported extension. Each file is
//! decoded, given a cached thumbnail, and probed for an EXIF capture date.
//! A file that fails to decode is logged and skipped — a partial catalog is
//! an acceptable outcome, never a fatal error. Only an unreadable directory
//! fails the scan itself.
//!
//! ## Thumbnail cache
//!
//! Thumbnails are hidden files colocated with their source, named
//! `.thumbnail_<original-filename>`, bounded to [`THUMBNAIL_MAX_EDGE`] pixels
//! on the long edge with aspect preserved. They are always stored as
//! RGB JPEG bytes regardless of the name's extension; readers sniff content,
//! so the cosmetic extension mismatch is harmless. If thumbnail derivation
//! fails, a blank placeholder of the standard size is written instead of
//! aborting the file's record.

use crate::meta;
use crate::types::ImageRecord;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbImage};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File extensions admitted by the folder scan (case-insensitive).
///
/// HEIC passes the filter but has no compiled decoder; such files fail to
/// decode and are skipped with a warning.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "bmp", "gif"];

/// Bound on the thumbnail's longer edge.
pub const THUMBNAIL_MAX_EDGE: u32 = 400;

const THUMBNAIL_JPEG_QUALITY: u8 = 85;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to encode thumbnail {path}: {source}")]
    ThumbnailEncode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Unsupported file type: {0}")]
    Unsupported(PathBuf),
}

/// The ordered collection of image records currently loaded.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<ImageRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a catalog from records a shell persisted earlier. No
    /// filesystem checks happen here; stale paths surface on first use.
    pub fn from_records(records: Vec<ImageRecord>) -> Self {
        Self { records }
    }

    /// Immutable view of the records, in catalog order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Explicit mutation handle for components that update records in place
    /// (rotation).
    pub fn records_mut(&mut self) -> &mut [ImageRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clear the catalog and rebuild it from one folder's supported images.
    ///
    /// Returns the number of records built. Per-file decode or thumbnail
    /// failures are logged and skipped; only an unreadable directory is an
    /// error.
    pub fn scan_folder(&mut self, folder: &Path) -> Result<usize, CatalogError> {
        self.records.clear();

        let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && !is_hidden(p) && is_supported(p))
            .collect();
        paths.sort();

        for path in &paths {
            match build_record(path) {
                Ok(record) => {
                    debug!(file = %record.filename, date = %record.display_date, "cataloged");
                    self.records.push(record);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping file"),
            }
        }

        Ok(self.records.len())
    }

    /// Append a single image to the existing catalog without clearing it.
    ///
    /// Unlike scanning, failure here is surfaced: the caller named one
    /// specific file and should learn that it was unusable.
    pub fn add_single_image(&mut self, path: &Path) -> Result<(), CatalogError> {
        if !is_supported(path) {
            return Err(CatalogError::Unsupported(path.to_path_buf()));
        }
        let record = build_record(path)?;
        self.records.push(record);
        Ok(())
    }
}

/// Decode, thumbnail, and probe one image file into a fresh record.
fn build_record(path: &Path) -> Result<ImageRecord, CatalogError> {
    let source_path = path.canonicalize()?;
    let filename = source_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let img = load_image(&source_path)?;

    let thumbnail_path = thumbnail_path_for(&source_path);
    if let Err(e) = write_thumbnail(&img, &thumbnail_path) {
        warn!(path = %source_path.display(), error = %e, "thumbnail failed, writing placeholder");
        write_placeholder_thumbnail(&thumbnail_path)?;
    }

    let capture_timestamp = meta::capture_timestamp(&source_path);
    let display_date = ImageRecord::format_display_date(capture_timestamp);

    Ok(ImageRecord {
        filename,
        source_path,
        thumbnail_path,
        capture_timestamp,
        display_date,
        rotation_degrees: 0,
    })
}

/// Decode an image from disk, sniffing the real format from file content
/// (thumbnail files carry JPEG bytes under arbitrary extensions).
pub fn load_image(path: &Path) -> Result<DynamicImage, CatalogError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| CatalogError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Cache path convention: a hidden sibling of the source file.
pub fn thumbnail_path_for(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    source.with_file_name(format!(".thumbnail_{name}"))
}

/// Derive and persist a thumbnail: bounded resize, RGB conversion, JPEG bytes.
pub fn write_thumbnail(img: &DynamicImage, dest: &Path) -> Result<(), CatalogError> {
    let bounded = if img.width() > THUMBNAIL_MAX_EDGE || img.height() > THUMBNAIL_MAX_EDGE {
        img.resize(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE, FilterType::Lanczos3)
    } else {
        img.clone()
    };
    // Non-RGB color modes (RGBA, grayscale, palette) all normalize to RGB8
    // before encoding.
    encode_jpeg_file(&bounded.to_rgb8(), dest)
}

/// Fallback when thumbnail derivation fails: a blank square of the standard
/// size, so the record still has a drawable thumbnail.
fn write_placeholder_thumbnail(dest: &Path) -> Result<(), CatalogError> {
    let blank = RgbImage::from_pixel(THUMBNAIL_MAX_EDGE, THUMBNAIL_MAX_EDGE, image::Rgb([255; 3]));
    encode_jpeg_file(&blank, dest)
}

fn encode_jpeg_file(img: &RgbImage, dest: &Path) -> Result<(), CatalogError> {
    let file = fs::File::create(dest)?;
    let writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, THUMBNAIL_JPEG_QUALITY)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|source| CatalogError::ThumbnailEncode {
            path: dest.to_path_buf(),
            source,
        })
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
