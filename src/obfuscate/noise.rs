//! Disc noise on the working canvas.

use rand::Rng;

use super::uniform_int;
use crate::raster::{Canvas, Paint};

/// Highest honored noise level.
pub const MAX_LEVEL: u32 = 10;

/// Discs stamped per noise level.
pub const DISCS_PER_LEVEL: u32 = 125;

/// One noise disc in working-canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disc {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

/// A scatter of discs over a `width`×`height` canvas.
#[derive(Debug, Clone, Default)]
pub struct NoiseField {
    pub discs: Vec<Disc>,
}

impl NoiseField {
    /// Scatter `min(level, 10) × 125` candidate discs.
    ///
    /// Centers lie in `[10, width] × [10, height]`, radii in `7..=10`. A disc
    /// whose box would begin above *and* left of the origin is dropped, so
    /// the field may hold slightly fewer discs than candidates.
    pub fn scatter<R: Rng + ?Sized>(rng: &mut R, level: u32, width: u32, height: u32) -> Self {
        let candidates = level.min(MAX_LEVEL) * DISCS_PER_LEVEL;
        let mut discs = Vec::with_capacity(candidates as usize);

        for _ in 0..candidates {
            let x = uniform_int(rng, 10.0, width as f64) as i32;
            let y = uniform_int(rng, 10.0, height as f64) as i32;
            let radius = rng.random_range(7..=10);

            if x - radius <= 0 && y - radius <= 0 {
                continue;
            }
            discs.push(Disc { x, y, radius });
        }

        Self { discs }
    }

    pub fn draw(&self, canvas: &mut Canvas, paint: Paint) {
        for disc in &self.discs {
            canvas.fill_disc(disc.x, disc.y, disc.radius, paint);
        }
    }
}
