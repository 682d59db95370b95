//! TTF font rendering for user-supplied fonts.
//!
//! Lays glyphs out with ab_glyph and stamps every pixel whose coverage
//! reaches one half. No anti-aliasing: drawn pixels are exactly the paint.

use ab_glyph::{Font, FontArc, Glyph, PxScale, ScaleFont, point};
use std::path::Path;

use super::font::{POINTS_TO_PIXELS, TextBounds, TextEngine};
use super::{Canvas, Paint};
use crate::error::{CaptchaError, Result};

/// Minimum coverage for a pixel to count as ink.
const COVERAGE_THRESHOLD: f32 = 0.5;

/// A TrueType/OpenType font loaded from disk.
#[derive(Clone)]
pub struct TtfFont {
    font: FontArc,
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont").finish_non_exhaustive()
    }
}

impl TtfFont {
    /// Read and parse a font file.
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| CaptchaError::FontResourceUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| unavailable(e.to_string()))?;
        Self::from_bytes(bytes).map_err(|e| match e {
            CaptchaError::FontResourceUnavailable { reason, .. } => unavailable(reason),
            other => other,
        })
    }

    /// Parse font data already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            CaptchaError::FontResourceUnavailable {
                path: "<memory>".into(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { font })
    }

    /// Position glyphs along the baseline starting at `(x, y)`.
    fn layout(&self, size: f32, x: f32, y: f32, text: &str) -> Vec<Glyph> {
        let scale = PxScale::from(size * POINTS_TO_PIXELS);
        let scaled = self.font.as_scaled(scale);

        let mut glyphs = Vec::new();
        let mut caret_x = x;
        let mut previous = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push(glyph_id.with_scale_and_position(scale, point(caret_x, y)));
            caret_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        glyphs
    }
}

impl TextEngine for TtfFont {
    fn measure(&self, size: f32, text: &str) -> TextBounds {
        let mut bounds: Option<TextBounds> = None;

        for glyph in self.layout(size, 0.0, 0.0, text) {
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let px = outlined.px_bounds();
                let b = bounds.get_or_insert(TextBounds {
                    left: px.min.x,
                    top: px.min.y,
                    right: px.max.x,
                    bottom: px.max.y,
                });
                b.left = b.left.min(px.min.x);
                b.top = b.top.min(px.min.y);
                b.right = b.right.max(px.max.x);
                b.bottom = b.bottom.max(px.max.y);
            }
        }

        bounds.unwrap_or_default()
    }

    fn draw(&self, canvas: &mut Canvas, size: f32, x: i32, y: i32, paint: Paint, text: &str) {
        for glyph in self.layout(size, x as f32, y as f32, text) {
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    if coverage >= COVERAGE_THRESHOLD {
                        let gx = px as i64 + bounds.min.x as i64;
                        let gy = py as i64 + bounds.min.y as i64;
                        canvas.set(gx, gy, paint.0);
                    }
                });
            }
        }
    }
}
