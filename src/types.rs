//! Shared types used across the contact sheet pipeline.
//!
//! [`ImageRecord`] is the unit of currency: the catalog produces an ordered
//! list of them, the transform mutates them in place, and the renderer and
//! export driver consume slices of them. Records are serializable so a shell
//! can persist or transport a catalog as JSON.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Display label substituted when an image carries no usable capture date.
///
/// Pagination sorts lexically on the formatted display date, so this sentinel
/// participates in plain string comparison with real dates. It starts with an
/// uppercase letter, which sorts after every `YYYY-...` date string — records
/// without a date therefore land on the final pages.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// How capture timestamps are rendered for captions and sort keys.
///
/// Lexical order on this format matches chronological order for real dates,
/// which keeps the string-sorted pagination sane for everything except the
/// [`UNKNOWN_DATE`] sentinel.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One entry per source image in the catalog.
///
/// Created when a folder is scanned or a single file is added; mutated in
/// place by rotation (which rewrites the source, regenerates the thumbnail,
/// and bumps `rotation_degrees`); never deleted individually — a new folder
/// scan clears and rebuilds the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Display name. Unique within one catalog, not across folders.
    pub filename: String,
    /// Absolute path to the original file. The file stays where it is;
    /// the record only references it.
    pub source_path: PathBuf,
    /// Cached small raster next to the source (`.thumbnail_<filename>`).
    /// Regenerated whenever the source or its rotation changes.
    pub thumbnail_path: PathBuf,
    /// Capture timestamp from EXIF, if present and parsable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_timestamp: Option<NaiveDateTime>,
    /// Pre-formatted caption/sort string: the timestamp in
    /// [`DISPLAY_DATE_FORMAT`], or [`UNKNOWN_DATE`].
    pub display_date: String,
    /// Cumulative rotation applied so far, normalized to `[0, 360)`.
    pub rotation_degrees: i32,
}

impl ImageRecord {
    /// Format a capture timestamp for display, substituting the sentinel
    /// when there is none.
    pub fn format_display_date(timestamp: Option<NaiveDateTime>) -> String {
        match timestamp {
            Some(ts) => ts.format(DISPLAY_DATE_FORMAT).to_string(),
            None => UNKNOWN_DATE.to_string(),
        }
    }
}
