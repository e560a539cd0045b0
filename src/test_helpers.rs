//! Shared test utilities for the proofsheet test suite.
//!
//! Synthetic image generators: tests need real, decodable files on disk
//! (scanning, thumbnailing, and rotation all go through the filesystem), but
//! committing binary fixtures would be opaque. These write small gradient
//! images instead — deterministic, a few hundred bytes, and visibly distinct
//! per pixel coordinate so resize and rotation bugs show up in assertions.
//!
//! The dated variant splices a minimal EXIF APP1 segment carrying
//! `DateTimeOriginal` between the JPEG's SOI marker and the rest of the
//! stream, so metadata extraction can be exercised against a known
//! timestamp.

use chrono::NaiveDateTime;
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

fn gradient_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            64,
        ])
    });
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, 90);
    encoder
        .encode(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Write a gradient JPEG of the given size. No EXIF metadata.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, gradient_jpeg_bytes(width, height)).unwrap();
}

/// Write a gradient JPEG whose EXIF `DateTimeOriginal` is `taken`.
pub fn create_test_jpeg_with_date(path: &Path, width: u32, height: u32, taken: NaiveDateTime) {
    let jpeg = gradient_jpeg_bytes(width, height);
    let date_str = taken.format("%Y:%m:%d %H:%M:%S").to_string();
    std::fs::write(path, splice_exif(&jpeg, &date_str)).unwrap();
}

/// Build a TIFF-format EXIF blob with one `DateTimeOriginal` field and
/// insert it as an APP1 segment right after the SOI marker.
fn splice_exif(jpeg: &[u8], date_str: &str) -> Vec<u8> {
    let field = Field {
        tag: Tag::DateTimeOriginal,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![date_str.as_bytes().to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut cursor = Cursor::new(Vec::new());
    writer.write(&mut cursor, false).unwrap();
    let blob = cursor.into_inner();

    // APP1 length counts its own two bytes plus the "Exif\0\0" identifier.
    let mut out = Vec::with_capacity(jpeg.len() + blob.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((blob.len() + 8) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&blob);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write a gradient PNG with an alpha channel, for non-RGB conversion paths.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    });
    img.save(path).unwrap();
}
