//! Grid layout arithmetic for contact sheet pages.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Given a page size, margin, and image count, [`compute_layout`] derives the
//! grid geometry shared by every page of one render: column/row counts, the
//! images-per-page batch size, and the pixel dimensions of one thumbnail cell.
//!
//! ## Algorithm
//!
//! 1. Reserve a fixed vertical band ([`HEADER_BAND`]) for the header and
//!    footer; the remainder is the usable grid area.
//! 2. Compute how many columns of at least [`MIN_CELL_EDGE`] pixels fit the
//!    page width with `margin` spacing, and how many rows (each needing an
//!    extra [`CAPTION_GUTTER`] for its caption lines) fit the usable height.
//! 3. Clamp both counts to `[2, 3]`. This is a fixed design trade-off
//!    favoring large, legible thumbnails over maximal density — a huge page
//!    still gets at most a 3×3 grid, a cramped one still gets 2×2.
//! 4. Divide the remaining area evenly into cells.
//!
//! The `image_count` parameter does not influence the grid shape: the layout
//! is a function of page geometry alone, and a catalog of two images still
//! renders into the same grid a catalog of two hundred would. Kept as
//! observed behavior; see DESIGN.md.

use serde::{Deserialize, Serialize};

/// Vertical band reserved at the top of the page for header and page-number
/// text (plus footer allowance for the watermark).
pub const HEADER_BAND: u32 = 150;

/// Minimum acceptable thumbnail cell edge, used when counting how many
/// columns/rows would fit before clamping.
pub const MIN_CELL_EDGE: u32 = 300;

/// Extra vertical space per grid row for the two caption lines drawn beneath
/// each thumbnail.
pub const CAPTION_GUTTER: u32 = 60;

/// Page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Default export page: US Letter at 300 dpi.
pub const DEFAULT_PAGE: PageSize = PageSize::new(2550, 3300);

/// Default page margin in pixels.
pub const DEFAULT_MARGIN: u32 = 50;

/// Derived grid geometry for one page size. Never persisted; recomputed on
/// every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGeometry {
    /// Batch size for pagination. Always `columns * rows`.
    pub images_per_page: usize,
    pub columns: u32,
    pub rows: u32,
    /// Thumbnail cell dimensions, excluding the caption gutter.
    pub cell_width: u32,
    pub cell_height: u32,
}

/// Compute the grid geometry for one page size and margin.
///
/// `image_count` is accepted for interface parity but does not affect the
/// result (see module docs).
///
/// Cell dimensions are guaranteed strictly positive even for pathologically
/// small page sizes: the division saturates and the result is floored at one
/// pixel rather than going to zero or wrapping.
pub fn compute_layout(page: PageSize, margin: u32, _image_count: usize) -> LayoutGeometry {
    let usable_height = page.height.saturating_sub(HEADER_BAND);

    let columns_that_fit = page.width.saturating_sub(margin) / (MIN_CELL_EDGE + margin);
    let rows_that_fit =
        usable_height.saturating_sub(margin) / (MIN_CELL_EDGE + CAPTION_GUTTER + margin);

    let columns = columns_that_fit.clamp(2, 3);
    let rows = rows_that_fit.clamp(2, 3);

    let cell_width = (page
        .width
        .saturating_sub((columns + 1) * margin)
        / columns)
        .max(1);
    let cell_height = (usable_height
        .saturating_sub((rows + 1) * margin + rows * CAPTION_GUTTER)
        / rows)
        .max(1);

    LayoutGeometry {
        images_per_page: (columns * rows) as usize,
        columns,
        rows,
        cell_width,
        cell_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_yields_three_by_three() {
        let layout = compute_layout(DEFAULT_PAGE, DEFAULT_MARGIN, 100);
        assert_eq!(layout.columns, 3);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.images_per_page, 9);
    }

    #[test]
    fn images_per_page_is_columns_times_rows() {
        for (w, h) in [(800, 1035), (2550, 3300), (1200, 1600), (4000, 5000)] {
            let layout = compute_layout(PageSize::new(w, h), 50, 10);
            assert_eq!(
                layout.images_per_page,
                (layout.columns * layout.rows) as usize
            );
        }
    }

    #[test]
    fn grid_counts_clamped_between_two_and_three() {
        // Tiny page: would fit zero 300px columns, clamps up to 2x2.
        let small = compute_layout(PageSize::new(200, 200), 10, 5);
        assert_eq!((small.columns, small.rows), (2, 2));

        // Enormous page: would fit many more, clamps down to 3x3.
        let big = compute_layout(PageSize::new(10_000, 12_000), 50, 5);
        assert_eq!((big.columns, big.rows), (3, 3));
    }

    #[test]
    fn cell_dimensions_always_positive() {
        // Pathologically small pages must not produce zero-size cells.
        for (w, h) in [(1, 1), (10, 10), (100, 160), (0, 0)] {
            let layout = compute_layout(PageSize::new(w, h), 50, 3);
            assert!(layout.cell_width >= 1, "width for {w}x{h}");
            assert!(layout.cell_height >= 1, "height for {w}x{h}");
        }
    }

    #[test]
    fn cells_fit_within_page_minus_margins() {
        let page = DEFAULT_PAGE;
        let margin = DEFAULT_MARGIN;
        let layout = compute_layout(page, margin, 9);

        let grid_width = layout.columns * layout.cell_width + (layout.columns + 1) * margin;
        assert!(grid_width <= page.width);

        let grid_height = layout.rows * (layout.cell_height + CAPTION_GUTTER)
            + (layout.rows + 1) * margin;
        assert!(grid_height <= page.height - HEADER_BAND);
    }

    #[test]
    fn narrow_tall_page_yields_two_by_three() {
        // 800 wide fits 2 columns; 1500 tall fits 3 rows: the 6-per-page grid.
        let layout = compute_layout(PageSize::new(800, 1500), 50, 7);
        assert_eq!(layout.columns, 2);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.images_per_page, 6);
    }

    #[test]
    fn image_count_does_not_change_grid() {
        let a = compute_layout(DEFAULT_PAGE, DEFAULT_MARGIN, 1);
        let b = compute_layout(DEFAULT_PAGE, DEFAULT_MARGIN, 500);
        assert_eq!(a, b);
    }
}
