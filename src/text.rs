//! Text measurement and drawing over either kind of resolved font.
//!
//! The renderer does not care whether font resolution produced a vector font
//! or fell through to the builtin bitmap font; both are drawn through the
//! same two entry points here. Vector fonts go through `imageproc`'s glyph
//! rasterizer; the bitmap font is a classic 5×7 ASCII matrix blitted at an
//! integer scale derived from the requested pixel size.
//!
//! No kerning, no shaping — glyphs advance by their nominal width only.

use crate::fonts::ResolvedFont;
use ab_glyph::PxScale;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// Nominal advance per bitmap glyph at scale 1: 5 pixel columns + 1 spacing.
const BITMAP_ADVANCE: u32 = 6;

/// Bitmap glyph height in pixel rows.
const BITMAP_HEIGHT: u32 = 7;

/// Draw `text` onto the canvas with its top-left corner at `(x, y)`.
///
/// Out-of-bounds pixels are clipped, never an error.
pub fn draw_text(
    canvas: &mut RgbImage,
    font: &ResolvedFont,
    size: f32,
    color: Rgb<u8>,
    x: i32,
    y: i32,
    text: &str,
) {
    match font {
        ResolvedFont::Vector(vec_font) => {
            draw_text_mut(canvas, color, x, y, PxScale::from(size), vec_font, text);
        }
        ResolvedFont::Bitmap => draw_bitmap_text(canvas, size, color, x, y, text),
    }
}

/// Measure the horizontal extent of `text` at the given pixel size.
pub fn text_width(font: &ResolvedFont, size: f32, text: &str) -> u32 {
    match font {
        ResolvedFont::Vector(vec_font) => text_size(PxScale::from(size), vec_font, text).0,
        ResolvedFont::Bitmap => {
            let glyphs = text.chars().count() as u32;
            if glyphs == 0 {
                0
            } else {
                // The last glyph contributes its 5 columns but no trailing
                // inter-glyph gap.
                (glyphs * BITMAP_ADVANCE - 1) * bitmap_scale(size)
            }
        }
    }
}

/// Integer magnification for the 5×7 font so its cap height roughly tracks
/// the requested pixel size.
fn bitmap_scale(size: f32) -> u32 {
    ((size / (BITMAP_HEIGHT + 1) as f32).round() as u32).max(1)
}

fn draw_bitmap_text(
    canvas: &mut RgbImage,
    size: f32,
    color: Rgb<u8>,
    x: i32,
    y: i32,
    text: &str,
) {
    let scale = bitmap_scale(size);
    let (width, height) = canvas.dimensions();

    for (i, ch) in text.chars().enumerate() {
        let glyph = glyph_columns(ch);
        let origin_x = x + (i as u32 * BITMAP_ADVANCE * scale) as i32;

        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..BITMAP_HEIGHT {
                if bits >> row & 1 == 0 {
                    continue;
                }
                // One glyph pixel becomes a scale x scale block.
                for dx in 0..scale {
                    for dy in 0..scale {
                        let px = origin_x + (col as u32 * scale + dx) as i32;
                        let py = y + (row * scale + dy) as i32;
                        if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Column bitmap for one ASCII character; bit 0 is the top row.
/// Characters outside the printable range render as `?`.
fn glyph_columns(ch: char) -> [u8; 5] {
    let idx = ch as usize;
    if (0x20..=0x7E).contains(&idx) {
        GLYPHS_5X7[idx - 0x20]
    } else {
        GLYPHS_5X7['?' as usize - 0x20]
    }
}

/// The classic public-domain 5×7 ASCII font, one `[u8; 5]` per character
/// from `' '` (0x20) through `'~'` (0x7E).
#[rustfmt::skip]
const GLYPHS_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x14, 0x08, 0x3E, 0x08, 0x14], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x04, 0x08, 0x10, 0x08], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::ResolvedFont;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn white_canvas(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, WHITE)
    }

    fn count_dark_pixels(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| p.0[0] < 128).count()
    }

    #[test]
    fn bitmap_text_marks_pixels() {
        let mut canvas = white_canvas(200, 40);
        draw_text(&mut canvas, &ResolvedFont::Bitmap, 16.0, BLACK, 5, 5, "Hello");
        assert!(count_dark_pixels(&canvas) > 0);
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut canvas = white_canvas(100, 40);
        draw_text(&mut canvas, &ResolvedFont::Bitmap, 16.0, BLACK, 5, 5, "");
        assert_eq!(count_dark_pixels(&canvas), 0);
    }

    #[test]
    fn bitmap_text_clips_at_canvas_edge() {
        // Must not panic when drawn partly or fully out of bounds.
        let mut canvas = white_canvas(20, 10);
        draw_text(
            &mut canvas,
            &ResolvedFont::Bitmap,
            16.0,
            BLACK,
            -30,
            -30,
            "clipped",
        );
        draw_text(&mut canvas, &ResolvedFont::Bitmap, 16.0, BLACK, 15, 5, "edge");
    }

    #[test]
    fn bitmap_width_excludes_trailing_gap() {
        // Scale 2 at size 16: each glyph advances 12px, but the measured
        // extent stops at the last glyph's final column — no dangling gap
        // that would push right-aligned text further left than its ink.
        let font = ResolvedFont::Bitmap;
        assert_eq!(text_width(&font, 16.0, "a"), 10);
        assert_eq!(text_width(&font, 16.0, "ab"), 22);
        assert_eq!(text_width(&font, 16.0, "abcd"), 46);
        assert_eq!(text_width(&font, 16.0, ""), 0);
    }

    #[test]
    fn bitmap_scale_never_zero() {
        assert_eq!(bitmap_scale(1.0), 1);
        assert_eq!(bitmap_scale(8.0), 1);
        assert_eq!(bitmap_scale(16.0), 2);
        assert_eq!(bitmap_scale(72.0), 9);
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph_columns('é'), glyph_columns('?'));
        assert_eq!(glyph_columns('\u{1F600}'), glyph_columns('?'));
    }
}
