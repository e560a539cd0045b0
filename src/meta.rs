//! Capture timestamp extraction from embedded EXIF metadata.
//!
//! A single best-effort parse: open the file, look for the
//! `DateTimeOriginal` tag (`EXIF:36867` — the moment the shutter fired, as
//! opposed to `DateTime`, which file managers rewrite on edit), and parse its
//! `YYYY:MM:DD HH:MM:SS` ASCII payload. Any failure along the way — no EXIF
//! container, missing tag, malformed date string — yields `None`, never an
//! error. The caller substitutes the "Unknown Date" display sentinel.

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// EXIF stores timestamps as `"YYYY:MM:DD HH:MM:SS"`.
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Extract the capture timestamp from an image file's EXIF data.
///
/// Returns `None` on any decoding error, missing tag, or malformed date —
/// metadata failure is always recovered locally and never surfaced.
pub fn capture_timestamp(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let raw = match &field.value {
        Value::Ascii(entries) => entries.first().and_then(|b| std::str::from_utf8(b).ok())?,
        _ => return None,
    };

    match NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATE_FORMAT) {
        Ok(ts) => Some(ts),
        Err(e) => {
            debug!(path = %path.display(), raw, error = %e, "unparsable DateTimeOriginal");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, create_test_jpeg_with_date};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn datetimeoriginal_is_extracted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dated.jpg");
        let taken = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();
        create_test_jpeg_with_date(&path, 64, 48, taken);

        assert_eq!(capture_timestamp(&path), Some(taken));
    }

    #[test]
    fn extracted_timestamp_flows_into_the_display_date() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dated.jpg");
        let taken = NaiveDate::from_ymd_opt(2021, 11, 30)
            .unwrap()
            .and_hms_opt(6, 5, 0)
            .unwrap();
        create_test_jpeg_with_date(&path, 64, 48, taken);

        let ts = capture_timestamp(&path);
        assert_eq!(
            crate::types::ImageRecord::format_display_date(ts),
            "2021-11-30 06:05"
        );
    }

    #[test]
    fn missing_file_yields_none() {
        assert_eq!(capture_timestamp(Path::new("/nonexistent/photo.jpg")), None);
    }

    #[test]
    fn jpeg_without_exif_yields_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.jpg");
        create_test_jpeg(&path, 64, 48);
        assert_eq!(capture_timestamp(&path), None);
    }

    #[test]
    fn non_image_file_yields_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("not-an-image.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert_eq!(capture_timestamp(&path), None);
    }
}
