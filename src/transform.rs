//! In-place image rotation with expand-to-fit semantics.
//!
//! Rotation rewrites the source file itself (same path, same format),
//! regenerates the cached thumbnail through the catalog's derivation
//! routine, and advances the record's cumulative `rotation_degrees`,
//! normalized to `[0, 360)`.
//!
//! Right-angle rotations go through the `image` crate's exact
//! `rotate90/180/270`. Any other angle expands the canvas to contain the
//! whole rotated image (no cropping) and warps through a projective
//! transform, filling uncovered corners with white.
//!
//! Positive degrees rotate clockwise.

use crate::catalog::{self, CatalogError};
use crate::types::ImageRecord;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Failed to re-encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Rotate one record's source image by `delta_degrees`, persist the result
/// over the original path, regenerate the thumbnail, and update the record.
pub fn rotate_record(record: &mut ImageRecord, delta_degrees: i32) -> Result<(), TransformError> {
    let img = catalog::load_image(&record.source_path)?;
    let rotated = rotate_image(&img, delta_degrees);

    // Saving by the source's own extension keeps the file's format stable.
    rotated
        .save(&record.source_path)
        .map_err(|source| TransformError::Encode {
            path: record.source_path.clone(),
            source,
        })?;

    catalog::write_thumbnail(&rotated, &record.thumbnail_path)?;

    record.rotation_degrees = (record.rotation_degrees + delta_degrees).rem_euclid(360);
    debug!(
        file = %record.filename,
        rotation = record.rotation_degrees,
        "rotated"
    );
    Ok(())
}

/// Rotate every record in a selection by the same delta.
///
/// Each record is attempted independently: a failure is logged and does not
/// abort the rest of the batch. Returns how many records succeeded.
pub fn rotate_batch(records: &mut [ImageRecord], delta_degrees: i32) -> usize {
    let mut succeeded = 0;
    for record in records {
        match rotate_record(record, delta_degrees) {
            Ok(()) => succeeded += 1,
            Err(e) => warn!(file = %record.filename, error = %e, "rotation failed"),
        }
    }
    succeeded
}

/// Rotate a decoded image by an arbitrary delta, growing the canvas so the
/// whole rotated image fits.
pub fn rotate_image(img: &DynamicImage, delta_degrees: i32) -> DynamicImage {
    match delta_degrees.rem_euclid(360) {
        0 => img.clone(),
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        degrees => rotate_arbitrary(img, degrees as f32),
    }
}

fn rotate_arbitrary(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let src = img.to_rgb8();
    let (w, h) = (src.width() as f32, src.height() as f32);
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());

    // Expanded canvas: the axis-aligned bounding box of the rotated image.
    let new_w = (w * cos + h * sin).ceil() as u32;
    let new_h = (w * sin + h * cos).ceil() as u32;

    // Rotate about the source center, then recenter on the bigger canvas.
    let projection = Projection::translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-w / 2.0, -h / 2.0);

    let mut out = RgbImage::from_pixel(new_w, new_h, Rgb([255, 255, 255]));
    warp_into(
        &src,
        &projection,
        Interpolation::Bilinear,
        Rgb([255, 255, 255]),
        &mut out,
    );
    DynamicImage::ImageRgb8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::test_helpers::create_test_jpeg;
    use tempfile::TempDir;

    fn single_record(tmp: &TempDir, w: u32, h: u32) -> ImageRecord {
        create_test_jpeg(&tmp.path().join("photo.jpg"), w, h);
        let mut catalog = Catalog::new();
        catalog.scan_folder(tmp.path()).unwrap();
        catalog.records()[0].clone()
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let tmp = TempDir::new().unwrap();
        let mut record = single_record(&tmp, 80, 40);

        rotate_record(&mut record, 90).unwrap();
        let img = catalog::load_image(&record.source_path).unwrap();
        assert_eq!((img.width(), img.height()), (40, 80));
        assert_eq!(record.rotation_degrees, 90);
    }

    #[test]
    fn four_quarter_turns_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut record = single_record(&tmp, 60, 40);

        for _ in 0..4 {
            rotate_record(&mut record, 90).unwrap();
        }
        assert_eq!(record.rotation_degrees, 0);

        let img = catalog::load_image(&record.source_path).unwrap();
        assert_eq!((img.width(), img.height()), (60, 40));
    }

    #[test]
    fn negative_delta_normalizes() {
        let tmp = TempDir::new().unwrap();
        let mut record = single_record(&tmp, 40, 40);

        rotate_record(&mut record, -90).unwrap();
        assert_eq!(record.rotation_degrees, 270);
    }

    #[test]
    fn rotation_regenerates_thumbnail() {
        let tmp = TempDir::new().unwrap();
        let mut record = single_record(&tmp, 800, 400);

        let before = catalog::load_image(&record.thumbnail_path).unwrap();
        rotate_record(&mut record, 90).unwrap();
        let after = catalog::load_image(&record.thumbnail_path).unwrap();

        // Landscape thumbnail became portrait.
        assert!(before.width() > before.height());
        assert!(after.height() > after.width());
    }

    #[test]
    fn arbitrary_angle_expands_canvas() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([0, 0, 0])));
        let rotated = rotate_image(&src, 45);
        assert!(rotated.width() > 100);
        assert!(rotated.height() > 50);
    }

    #[test]
    fn zero_delta_is_identity() {
        let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([10, 20, 30])));
        let out = rotate_image(&src, 0);
        assert_eq!((out.width(), out.height()), (30, 20));
    }

    #[test]
    fn batch_continues_past_missing_file() {
        let tmp = TempDir::new().unwrap();
        let good = single_record(&tmp, 40, 40);
        let mut broken = good.clone();
        broken.source_path = tmp.path().join("vanished.jpg");
        broken.filename = "vanished.jpg".to_string();

        let mut records = vec![broken, good];
        let succeeded = rotate_batch(&mut records, 90);

        assert_eq!(succeeded, 1);
        assert_eq!(records[0].rotation_degrees, 0);
        assert_eq!(records[1].rotation_degrees, 90);
    }
}
