//! Built-in bitmap font.
//!
//! Uses the Spleen bitmap font family, scaled nearest-neighbor to the
//! requested size. Glyph pixels are either on or off, so drawn text never
//! introduces colors outside the palette.

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::font::{POINTS_TO_PIXELS, TextBounds, TextEngine};
use super::{Canvas, Paint};

/// One embedded Spleen face.
#[derive(Debug, Clone, Copy)]
struct Face {
    data: &'static [u8],
    width: usize,
    height: usize,
    /// Rows from the cell top to the baseline.
    baseline: usize,
}

const FACES: [Face; 3] = [
    Face {
        data: FONT_6X12,
        width: 6,
        height: 12,
        baseline: 10,
    },
    Face {
        data: FONT_8X16,
        width: 8,
        height: 16,
        baseline: 13,
    },
    Face {
        data: FONT_12X24,
        width: 12,
        height: 24,
        baseline: 20,
    },
];

/// A face scaled to a concrete cell size.
#[derive(Debug, Clone, Copy)]
struct Layout {
    face: Face,
    cell_width: usize,
    cell_height: usize,
    baseline: usize,
}

impl Layout {
    fn for_size(size: f32) -> Self {
        let pixels = (size * POINTS_TO_PIXELS).max(1.0);
        // Smallest face at least as tall as the target, else the largest.
        let face = FACES
            .iter()
            .copied()
            .find(|f| f.height as f32 >= pixels)
            .unwrap_or(FACES[FACES.len() - 1]);

        let factor = pixels / face.height as f32;
        Self {
            face,
            cell_width: ((face.width as f32 * factor).round() as usize).max(1),
            cell_height: ((face.height as f32 * factor).round() as usize).max(1),
            baseline: (face.baseline as f32 * factor).round() as usize,
        }
    }
}

/// Embedded fixed-width font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl TextEngine for BitmapFont {
    fn measure(&self, size: f32, text: &str) -> TextBounds {
        let layout = Layout::for_size(size);
        let count = text.chars().count();
        TextBounds {
            left: 0.0,
            top: -(layout.baseline as f32),
            right: (count * layout.cell_width) as f32,
            bottom: (layout.cell_height - layout.baseline) as f32,
        }
    }

    fn draw(&self, canvas: &mut Canvas, size: f32, x: i32, y: i32, paint: Paint, text: &str) {
        let layout = Layout::for_size(size);
        let mut parser = PSF2Font::new(layout.face.data).ok();
        let top = y as i64 - layout.baseline as i64;

        for (i, ch) in text.chars().enumerate() {
            let native = glyph_bitmap(parser.as_mut(), layout.face, ch);
            let cell = resample(
                &native,
                (layout.face.width, layout.face.height),
                (layout.cell_width, layout.cell_height),
            );

            let left = x as i64 + (i * layout.cell_width) as i64;
            for (index, _) in cell.iter().enumerate().filter(|(_, on)| **on) {
                let gx = (index % layout.cell_width) as i64;
                let gy = (index / layout.cell_width) as i64;
                canvas.set(left + gx, top + gy, paint.0);
            }
        }
    }
}

/// On/off pixels of `ch` in the face's native cell, row-major.
///
/// A missing glyph, or a face that failed to parse, yields a hollow box.
fn glyph_bitmap(parser: Option<&mut PSF2Font<'static>>, face: Face, ch: char) -> Vec<bool> {
    let mut utf8 = [0u8; 4];
    let rows = parser.and_then(|p| p.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes()));
    let Some(rows) = rows else {
        return hollow_box(face.width, face.height);
    };

    let mut cell = vec![false; face.width * face.height];
    for (row_y, row) in rows.enumerate().take(face.height) {
        for (col_x, on) in row.enumerate().take(face.width) {
            cell[row_y * face.width + col_x] = on;
        }
    }
    cell
}

/// Nearest-neighbor resample of a row-major cell from `from` to `to` (width, height).
fn resample(cell: &[bool], from: (usize, usize), to: (usize, usize)) -> Vec<bool> {
    let (src_w, src_h) = from;
    let (dst_w, dst_h) = to;

    (0..dst_w * dst_h)
        .map(|i| {
            let sx = (i % dst_w) * src_w / dst_w;
            let sy = (i / dst_w) * src_h / dst_h;
            cell.get(sy * src_w + sx).copied().unwrap_or(false)
        })
        .collect()
}

/// One-pixel outline filling a `width`×`height` cell.
fn hollow_box(width: usize, height: usize) -> Vec<bool> {
    (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            x == 0 || y == 0 || x + 1 == width || y + 1 == height
        })
        .collect()
}
