//! Text measurement and stamping.
//!
//! ## Coordinates
//!
//! Bounds are relative to the pen origin on the baseline, y pointing down:
//!
//! ```text
//!        top (negative)
//!   ┌──────────────┐
//!   │  K d 7 m Z a │
//! ──●──────────────┼── baseline (y = 0)
//!   └──────────────┘
//!   left      bottom (descent, >= 0)   right
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{BitmapFont, Canvas, Paint, TtfFont};
use crate::error::Result;

/// Screen pixels per typographic point (96 dpi).
pub const POINTS_TO_PIXELS: f32 = 96.0 / 72.0;

/// Ink bounds of a string relative to its pen origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl TextBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Pen position that centers this ink box inside a `width`×`height` area.
    ///
    /// x is floored and the baseline y rounded half away from zero.
    pub fn centered_origin(&self, width: f32, height: f32) -> (i32, i32) {
        let x = (width / 2.0 - self.width() / 2.0 - self.left).floor();
        let y = (height / 2.0 + self.height() / 2.0 - self.bottom).round();
        (x as i32, y as i32)
    }
}

/// Something that can measure and draw text at a point size.
pub trait TextEngine {
    /// Ink bounds of `text` at `size` points.
    fn measure(&self, size: f32, text: &str) -> TextBounds;

    /// Draw `text` with its pen origin (baseline, left) at `(x, y)`.
    fn draw(&self, canvas: &mut Canvas, size: f32, x: i32, y: i32, paint: Paint, text: &str);
}

/// Where the captcha's font comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSource {
    /// Embedded Spleen bitmap font; never fails to load.
    #[default]
    Builtin,
    /// TrueType/OpenType file on disk.
    File(PathBuf),
}

impl FontSource {
    /// Load the engine, failing with `FontResourceUnavailable` for unreadable files.
    pub fn load(&self) -> Result<Box<dyn TextEngine>> {
        match self {
            FontSource::Builtin => Ok(Box::new(BitmapFont)),
            FontSource::File(path) => Ok(Box::new(TtfFont::open(path)?)),
        }
    }
}

impl From<String> for FontSource {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("builtin") {
            FontSource::Builtin
        } else {
            FontSource::File(PathBuf::from(value))
        }
    }
}

impl From<FontSource> for String {
    fn from(source: FontSource) -> Self {
        match source {
            FontSource::Builtin => "builtin".to_string(),
            FontSource::File(path) => path.display().to_string(),
        }
    }
}
