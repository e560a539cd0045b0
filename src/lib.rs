//! # Proofsheet
//!
//! A contact-sheet engine for photographers: point it at a folder of
//! photos and it assembles paginated thumbnail grids — captioned with
//! filename and capture date, headed with free-form text, optionally
//! watermarked — and exports them as JPEG, PNG, or a multi-page PDF.
//!
//! # Architecture: Catalog → Layout → Render → Export
//!
//! The engine is a synchronous pipeline of small modules with one shared
//! data shape, the [`types::ImageRecord`]:
//!
//! ```text
//! 1. Catalog   folder     →  ordered records    (decode, thumbnail, EXIF date)
//! 2. Layout    page size  →  grid geometry      (pure arithmetic, no I/O)
//! 3. Render    batch      →  page canvas        (header, grid, captions, watermark)
//! 4. Export    canvases   →  files on disk      (numbered images or one PDF)
//! ```
//!
//! Every call is synchronous and runs to completion on the calling thread:
//! a scan or export returns a complete result or a failure, never a partial
//! handle. The preview path reuses stages 2–3 at a reduced page size.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The `ImageRecord` shape and date-display formatting shared by all stages |
//! | [`meta`] | EXIF capture-timestamp extraction — best-effort, never fails |
//! | [`catalog`] | Folder scanning, decoding, thumbnail cache, record construction |
//! | [`transform`] | In-place rotation of source + thumbnail with expand-to-fit semantics |
//! | [`layout`] | Pure grid arithmetic: columns, rows, images-per-page, cell sizes |
//! | [`fonts`] | Font resolution with a deterministic named → generic → builtin fallback chain |
//! | [`text`] | Text drawing and measurement over vector or builtin bitmap fonts |
//! | [`render`] | Single-page composition: header, grid, captions, watermark |
//! | [`pdf`] | Multi-page PDF assembly from rendered canvases |
//! | [`export`] | Pagination driver: sort, batch, render all pages, encode to disk |
//! | [`preview`] | One reduced-resolution page for on-screen preview |
//! | [`settings`] | Persisted settings and named presets (`settings.json` / `presets.json`) |
//! | [`output`] | CLI output formatting |

pub mod catalog;
pub mod export;
pub mod fonts;
pub mod layout;
pub mod meta;
pub mod output;
pub mod pdf;
pub mod preview;
pub mod render;
pub mod settings;
pub mod text;
pub mod transform;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
