//! Font resolution with a deterministic fallback chain.
//!
//! A render call names a font family; this module turns that name into a
//! usable font resource. Resolution is an explicit ordered list of candidate
//! strategies, tried in order, first success wins — a pure lookup with no
//! exceptions-as-control-flow:
//!
//! 1. **Named**: a system font file whose stem matches the requested name
//!    (case-insensitive) in the platform font directories.
//! 2. **Generic**: the same lookup over a fixed list of widely-installed
//!    families (DejaVu Sans, Liberation Sans, Arial, Helvetica).
//! 3. **Builtin**: the embedded bitmap font in [`crate::text`].
//!
//! The chain always terminates in the builtin fallback, so rendering can
//! never fail solely because a font is unresolvable.

use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Platform directories searched for font files.
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/System/Library/Fonts",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Generic families tried when the requested font is unavailable.
const GENERIC_FALLBACKS: &[&str] = &[
    "DejaVuSans",
    "LiberationSans-Regular",
    "Arial",
    "Helvetica",
];

/// Name reported as the default font for settings validation.
pub const DEFAULT_FONT: &str = "DejaVuSans";

/// A font resource usable by the renderer.
pub enum ResolvedFont {
    /// A parsed vector font (TrueType/OpenType), drawn via `imageproc`.
    Vector(FontVec),
    /// The embedded 5×7 bitmap font — the fallback of last resort.
    Bitmap,
}

/// One step of the resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    Named(String),
    Generic,
    Builtin,
}

fn resolution_chain(name: &str) -> Vec<Strategy> {
    let mut chain = Vec::with_capacity(3);
    if !name.trim().is_empty() {
        chain.push(Strategy::Named(name.trim().to_string()));
    }
    chain.push(Strategy::Generic);
    chain.push(Strategy::Builtin);
    chain
}

/// Resolve a font name to a usable font resource.
///
/// Never fails: the final strategy is the embedded bitmap font.
pub fn resolve_font(name: &str) -> ResolvedFont {
    for strategy in resolution_chain(name) {
        match strategy {
            Strategy::Named(ref wanted) => {
                if let Some(font) = find_font_path(wanted).and_then(|p| load_vector_font(&p)) {
                    debug!(font = wanted, "resolved named font");
                    return ResolvedFont::Vector(font);
                }
            }
            Strategy::Generic => {
                for fallback in GENERIC_FALLBACKS {
                    if let Some(font) = find_font_path(fallback).and_then(|p| load_vector_font(&p))
                    {
                        debug!(requested = name, fallback, "resolved generic fallback font");
                        return ResolvedFont::Vector(font);
                    }
                }
            }
            Strategy::Builtin => {
                debug!(requested = name, "falling back to builtin bitmap font");
                return ResolvedFont::Bitmap;
            }
        }
    }
    ResolvedFont::Bitmap
}

/// Resolve a font name to the path of a matching font file, if any.
///
/// This is the lookup a shell uses to validate a font choice; [`resolve_font`]
/// layers the generic and builtin fallbacks on top.
pub fn find_font_path(name: &str) -> Option<PathBuf> {
    for dir in FONT_DIRS {
        let root = Path::new(dir);
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(root)
            .max_depth(4)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if is_font_file(path) && stem_matches(path, name) {
                return Some(path.to_path_buf());
            }
        }
    }
    None
}

/// List the stems of all font files found in the platform directories,
/// sorted and deduplicated. Used by shells to populate a font picker and by
/// settings loading to validate a persisted font name.
pub fn available_fonts() -> Vec<String> {
    let mut names: Vec<String> = FONT_DIRS
        .iter()
        .map(Path::new)
        .filter(|d| d.is_dir())
        .flat_map(|d| {
            WalkDir::new(d)
                .max_depth(4)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| is_font_file(e.path()))
                .filter_map(|e| {
                    e.path()
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                })
                .collect::<Vec<_>>()
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

fn is_font_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

fn stem_matches(path: &Path, name: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(name))
}

fn load_vector_font(path: &Path) -> Option<FontVec> {
    let data = std::fs::read(path).ok()?;
    FontVec::try_from_vec(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_for_named_font_has_three_steps() {
        let chain = resolution_chain("SomeFont");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], Strategy::Named("SomeFont".to_string()));
        assert_eq!(chain[1], Strategy::Generic);
        assert_eq!(chain[2], Strategy::Builtin);
    }

    #[test]
    fn chain_for_empty_name_skips_named_step() {
        let chain = resolution_chain("   ");
        assert_eq!(chain, vec![Strategy::Generic, Strategy::Builtin]);
    }

    #[test]
    fn resolve_never_fails() {
        // Whatever the host has installed, resolution terminates in a usable
        // font — worst case the builtin bitmap.
        let _ = resolve_font("definitely-not-a-real-font-name");
        let _ = resolve_font("");
    }

    #[test]
    fn nonexistent_font_has_no_path() {
        assert_eq!(find_font_path("definitely-not-a-real-font-name"), None);
    }
}
