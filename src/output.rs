//! CLI output formatting.
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! Catalog listing:
//!
//! ```text
//! Catalog (3 images)
//! 001 dawn.jpg
//!     Date: 2024-03-01 10:00
//! 002 dusk.jpg
//!     Date: Unknown Date
//!     Rotation: 90°
//! ```

use crate::catalog::Catalog;
use crate::types::ImageRecord;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn record_lines(index: usize, record: &ImageRecord) -> Vec<String> {
    let mut lines = vec![format!("{} {}", format_index(index), record.filename)];
    lines.push(format!("    Date: {}", record.display_date));
    if record.rotation_degrees != 0 {
        lines.push(format!("    Rotation: {}°", record.rotation_degrees));
    }
    lines
}

/// Format the full catalog listing.
pub fn format_catalog(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!(
        "Catalog ({} image{})",
        catalog.len(),
        if catalog.len() == 1 { "" } else { "s" }
    )];
    for (i, record) in catalog.records().iter().enumerate() {
        lines.extend(record_lines(i + 1, record));
    }
    lines
}

pub fn print_catalog(catalog: &Catalog) {
    for line in format_catalog(catalog) {
        println!("{}", line);
    }
}

/// Format the available-fonts listing shown by the `fonts` command.
pub fn format_fonts(fonts: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Fonts ({})", fonts.len())];
    lines.extend(fonts.iter().map(|f| format!("    {}", f)));
    lines
}

pub fn print_fonts(fonts: &[String]) {
    for line in format_fonts(fonts) {
        println!("{}", line);
    }
}
