//! # Raster Surface
//!
//! [`Canvas`] is the drawing surface the pipeline paints on: an owned RGBA
//! buffer with the handful of primitives a captcha needs. Paints carry an
//! alpha value, but drawing *replaces* pixels rather than blending, so every
//! pixel of a finished canvas is one of the registered paint colors.
//!
//! Text goes through the [`TextEngine`] trait, implemented by
//! [`BitmapFont`] (embedded Spleen bitmaps) and [`TtfFont`] (ab_glyph).

pub mod bitmap_font;
pub mod font;
pub mod ttf_font;

pub use bitmap_font::BitmapFont;
pub use font::{FontSource, TextBounds, TextEngine};
pub use ttf_font::TtfFont;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::color::ColorSpec;

/// Alpha used for text, line and noise ink (roughly half transparent).
pub const TRANSLUCENT_ALPHA: u8 = 128;

/// A registered drawing color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint(pub Rgba<u8>);

impl Paint {
    pub fn opaque(color: ColorSpec) -> Self {
        Self::with_alpha(color, u8::MAX)
    }

    pub fn translucent(color: ColorSpec) -> Self {
        Self::with_alpha(color, TRANSLUCENT_ALPHA)
    }

    pub fn with_alpha(color: ColorSpec, alpha: u8) -> Self {
        Paint(Rgba([color.red(), color.green(), color.blue(), alpha]))
    }

    /// The RGB part, as it appears in an encoded image.
    pub fn color(&self) -> ColorSpec {
        ColorSpec::new(self.0[0], self.0[1], self.0[2])
    }
}

/// Owned RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Allocate a fully transparent black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Paint every pixel.
    pub fn fill(&mut self, paint: Paint) {
        for pixel in self.image.pixels_mut() {
            *pixel = paint.0;
        }
    }

    /// Filled rectangle between two corners, both inclusive. Clipped.
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, paint: Paint) {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        let w = (right - left + 1) as u32;
        let h = (bottom - top + 1) as u32;
        draw_filled_rect_mut(&mut self.image, Rect::at(left, top).of_size(w, h), paint.0);
    }

    /// Filled disc centered at `(cx, cy)`. Clipped.
    pub fn fill_disc(&mut self, cx: i32, cy: i32, radius: i32, paint: Paint) {
        draw_filled_circle_mut(&mut self.image, (cx, cy), radius, paint.0);
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(*self.image.get_pixel(x as u32, y as u32))
    }

    /// Set one pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    /// Stretch `source` over the whole canvas (nearest neighbor, opaque).
    pub fn copy_resized(&mut self, source: &DynamicImage) {
        let resized = imageops::resize(
            &source.to_rgba8(),
            self.width(),
            self.height(),
            FilterType::Nearest,
        );
        for (dst, src) in self.image.pixels_mut().zip(resized.pixels()) {
            *dst = Rgba([src[0], src[1], src[2], u8::MAX]);
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
