//! Reduced-resolution single-page preview.
//!
//! The preview renders exactly one page at a fixed 800px width, with the
//! height derived from the same 8.5x11 aspect ratio as the default export
//! page. Layout is recomputed against this smaller page, so the preview's
//! images-per-page can legitimately differ from the export's.
//!
//! Unlike export, the preview takes the catalog as loaded: no date sort.

use crate::catalog::Catalog;
use crate::fonts;
use crate::layout::{PageSize, compute_layout};
use crate::render::{self, RenderConfig};
use image::RgbImage;
use tracing::warn;

/// Fixed preview canvas width in pixels.
pub const PREVIEW_WIDTH: u32 = 800;

/// Preview page size: fixed width, letter-ratio height.
pub fn preview_page_size() -> PageSize {
    let height = (PREVIEW_WIDTH as f32 * 11.0 / 8.5).round() as u32;
    PageSize::new(PREVIEW_WIDTH, height)
}

/// Render one preview page, 1-based.
///
/// Returns `None` when the catalog is empty or `page_number` is out of
/// range; render failures are logged and also collapse to `None` since the
/// preview surface has no error channel.
pub fn render_preview(
    catalog: &Catalog,
    config: &RenderConfig,
    page_number: usize,
) -> Option<RgbImage> {
    if catalog.is_empty() || page_number == 0 {
        return None;
    }

    let page = preview_page_size();
    let geometry = compute_layout(page, config.margin, catalog.len());
    let per_page = geometry.images_per_page as usize;
    let total_pages = catalog.len().div_ceil(per_page);
    if page_number > total_pages {
        return None;
    }

    let start = (page_number - 1) * per_page;
    let end = (start + per_page).min(catalog.len());
    let batch = &catalog.records()[start..end];

    let preview_config = RenderConfig {
        page,
        ..config.clone()
    };
    let font = fonts::resolve_font(&config.font_name);
    match render::render_page(batch, &geometry, &preview_config, &font, page_number, total_pages) {
        Ok(canvas) => Some(canvas),
        Err(e) => {
            warn!(page_number, error = %e, "preview render failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_jpeg;
    use tempfile::TempDir;

    fn preview_catalog(count: usize) -> (TempDir, Catalog) {
        let tmp = TempDir::new().unwrap();
        for i in 0..count {
            create_test_jpeg(&tmp.path().join(format!("img{i}.jpg")), 90, 60);
        }
        let mut catalog = Catalog::new();
        catalog.scan_folder(tmp.path()).unwrap();
        (tmp, catalog)
    }

    #[test]
    fn preview_page_is_letter_ratio() {
        let page = preview_page_size();
        assert_eq!(page.width, 800);
        assert_eq!(page.height, 1035);
    }

    #[test]
    fn empty_catalog_has_no_preview() {
        let config = RenderConfig::default();
        assert!(render_preview(&Catalog::new(), &config, 1).is_none());
    }

    #[test]
    fn out_of_range_page_has_no_preview() {
        let (_tmp, catalog) = preview_catalog(2);
        let config = RenderConfig::default();
        assert!(render_preview(&catalog, &config, 0).is_none());
        assert!(render_preview(&catalog, &config, 99).is_none());
    }

    #[test]
    fn first_page_renders_at_preview_size() {
        let (_tmp, catalog) = preview_catalog(2);
        let config = RenderConfig::default();

        let canvas = render_preview(&catalog, &config, 1).unwrap();
        assert_eq!(canvas.width(), PREVIEW_WIDTH);
        assert_eq!(canvas.height(), 1035);
    }

    #[test]
    fn preview_is_idempotent() {
        let (_tmp, catalog) = preview_catalog(3);
        let config = RenderConfig::default();

        let a = render_preview(&catalog, &config, 1).unwrap();
        let b = render_preview(&catalog, &config, 1).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
