//! Multi-pole radial distortion.
//!
//! ## Formula
//!
//! For every final pixel `(ix, iy)` and every pole `p`:
//!
//! ```text
//! (dx, dy) = (ix - p.x, iy - p.y)
//! r        = sqrt(dx·dx·dy·dy)          // |dx·dy|, not the Euclidean norm
//! (x, y)  += (dx, dy) · p.amplitude · sin(π·r / p.radius)   when 0 < r ≤ radius
//! ```
//!
//! `(x, y)·scale` then indexes the supersampled working canvas. With the
//! product form the influence region of a pole is cross-shaped, and pixels
//! on the pole's own row or column are never displaced.

use image::Rgba;
use rand::Rng;
use std::f64::consts::PI;

use super::{uniform_int, unit};
use crate::raster::Canvas;

/// Poles per captcha.
pub const POLE_COUNT: usize = 3;

/// A local warp center in final-canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pole {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Always negative for random poles: samples are pulled toward the pole.
    pub amplitude: f64,
}

impl Pole {
    /// Displacement this pole contributes at `(ix, iy)`.
    #[inline]
    pub fn offset(&self, ix: f64, iy: f64) -> (f64, f64) {
        let dx = ix - self.x;
        let dy = iy - self.y;

        if dx == 0.0 && dy == 0.0 {
            return (0.0, 0.0);
        }
        if self.radius <= 0.0 {
            return (0.0, 0.0);
        }

        let r = (dx * dx * dy * dy).sqrt();
        if r > self.radius {
            return (0.0, 0.0);
        }

        let r_scale = self.amplitude * (PI * r / self.radius).sin();
        (dx * r_scale, dy * r_scale)
    }
}

/// Warps the working canvas into the final canvas.
#[derive(Debug, Clone)]
pub struct DistortionEngine {
    pub poles: Vec<Pole>,
    /// Working-canvas pixels per final-canvas pixel.
    pub scale: u32,
}

impl DistortionEngine {
    /// Three random poles for a `width`×`height` final canvas.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: u32,
        height: u32,
        perturbation: f64,
        scale: u32,
    ) -> Self {
        let (w, h) = (width as f64, height as f64);
        let poles = (0..POLE_COUNT)
            .map(|_| Pole {
                x: uniform_int(rng, w * 0.2, w * 0.8) as f64,
                y: uniform_int(rng, h * 0.2, h * 0.8) as f64,
                radius: uniform_int(rng, h * 0.2, h * 0.8) as f64,
                amplitude: perturbation * (-unit(rng) * 0.15 - 0.15),
            })
            .collect();

        Self { poles, scale }
    }

    /// Source position in final-canvas units for final pixel `(ix, iy)`.
    pub fn displace(&self, ix: u32, iy: u32) -> (f64, f64) {
        let (fx, fy) = (ix as f64, iy as f64);
        let mut x = fx;
        let mut y = fy;

        for pole in &self.poles {
            let (ox, oy) = pole.offset(fx, fy);
            x += ox;
            y += oy;
        }

        (x, y)
    }

    /// Populate `target` from the supersampled `source`.
    ///
    /// Samples landing outside `source` fall back to its `(0, 0)` color, and
    /// any sample equal to that color leaves the target pixel untouched, so a
    /// background image on `target` shows through wherever no ink lands.
    pub fn apply(&self, source: &Canvas, target: &mut Canvas) {
        let Some(background) = source.get(0, 0) else {
            return;
        };
        let scale = self.scale as f64;
        let src_w = source.width() as f64;
        let src_h = source.height() as f64;

        for ix in 0..target.width() {
            for iy in 0..target.height() {
                let (x, y) = self.displace(ix, iy);
                let (x, y) = (x * scale, y * scale);

                let mut color: Rgba<u8> = background;
                if x >= 0.0 && x < src_w && y >= 0.0 && y < src_h {
                    color = source.get(x as i64, y as i64).unwrap_or(background);
                }

                if color != background {
                    target.set(ix as i64, iy as i64, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Paint;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BG: Paint = Paint(Rgba([255, 255, 255, 255]));
    const INK: Paint = Paint(Rgba([97, 97, 97, 128]));

    fn pole(x: f64, y: f64, radius: f64, amplitude: f64) -> Pole {
        Pole {
            x,
            y,
            radius,
            amplitude,
        }
    }

    #[test]
    fn test_random_pole_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let engine = DistortionEngine::random(&mut rng, 150, 60, 0.75, 5);
            assert_eq!(engine.poles.len(), POLE_COUNT);
            for p in &engine.poles {
                assert!((30.0..=120.0).contains(&p.x), "{p:?}");
                assert!((12.0..=48.0).contains(&p.y), "{p:?}");
                assert!((12.0..=48.0).contains(&p.radius), "{p:?}");
                // 0.75 * [-0.3, -0.15)
                assert!(p.amplitude <= -0.75 * 0.15 && p.amplitude > -0.75 * 0.3, "{p:?}");
            }
        }
    }

    #[test]
    fn test_amplitude_scales_with_perturbation() {
        let weak = DistortionEngine::random(&mut StdRng::seed_from_u64(9), 100, 40, 0.5, 5);
        let strong = DistortionEngine::random(&mut StdRng::seed_from_u64(9), 100, 40, 1.0, 5);
        for (a, b) in weak.poles.iter().zip(&strong.poles) {
            assert!((a.amplitude * 2.0 - b.amplitude).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pole_center_has_no_offset() {
        let p = pole(10.0, 10.0, 20.0, -0.2);
        assert_eq!(p.offset(10.0, 10.0), (0.0, 0.0));
    }

    #[test]
    fn test_axis_aligned_points_are_untouched() {
        // dx·dy = 0 on the pole's row and column, so r = 0 and sin(0) = 0.
        let p = pole(10.0, 10.0, 20.0, -0.2);
        assert_eq!(p.offset(14.0, 10.0), (0.0, 0.0));
        assert_eq!(p.offset(10.0, 3.0), (0.0, 0.0));
    }

    #[test]
    fn test_product_radius_not_euclidean() {
        let p = pole(0.0, 0.0, 10.0, -0.2);
        // Euclidean distance 5 but |dx·dy| = 12 > 10: outside.
        assert_eq!(p.offset(3.0, 4.0), (0.0, 0.0));
        // Euclidean distance ~8.06 but |dx·dy| = 8: inside.
        let (ox, oy) = p.offset(8.0, 1.0);
        let expected = -0.2 * (PI * 8.0 / 10.0).sin();
        assert!((ox - 8.0 * expected).abs() < 1e-12);
        assert!((oy - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_radius_pole_is_inert() {
        let p = pole(5.0, 5.0, 0.0, -0.2);
        assert_eq!(p.offset(6.0, 5.0), (0.0, 0.0));
    }

    #[test]
    fn test_offsets_accumulate() {
        let engine = DistortionEngine {
            poles: vec![pole(0.0, 0.0, 10.0, -0.2), pole(0.0, 0.0, 10.0, -0.2)],
            scale: 1,
        };
        let single = pole(0.0, 0.0, 10.0, -0.2).offset(2.0, 2.0);
        let (x, y) = engine.displace(2, 2);
        assert!((x - (2.0 + 2.0 * single.0)).abs() < 1e-12);
        assert!((y - (2.0 + 2.0 * single.1)).abs() < 1e-12);
    }

    #[test]
    fn test_identity_downsamples() {
        // No poles: final pixel (ix, iy) samples working pixel (ix·s, iy·s).
        let mut source = Canvas::new(40, 20);
        source.fill(BG);
        source.fill_rect(10, 5, 14, 9, INK);

        let mut target = Canvas::new(8, 4);
        target.fill(BG);
        DistortionEngine {
            poles: vec![],
            scale: 5,
        }
        .apply(&source, &mut target);

        assert_eq!(target.get(2, 1), Some(INK.0));
        assert_eq!(target.get(0, 0), Some(BG.0));
        assert_eq!(target.get(3, 1), Some(BG.0));
    }

    #[test]
    fn test_background_samples_leave_target_untouched() {
        let mut source = Canvas::new(20, 20);
        source.fill(BG);
        let marker = Paint(Rgba([1, 2, 3, 255]));
        let mut target = Canvas::new(4, 4);
        target.fill(marker);

        DistortionEngine {
            poles: vec![],
            scale: 5,
        }
        .apply(&source, &mut target);

        assert!(target.as_image().pixels().all(|p| *p == marker.0));
    }

    #[test]
    fn test_out_of_bounds_uses_background() {
        // A strong positive pole pushes samples off the source canvas.
        let mut source = Canvas::new(50, 50);
        source.fill(INK);
        source.set(0, 0, BG.0);
        let mut target = Canvas::new(10, 10);
        target.fill(BG);

        DistortionEngine {
            poles: vec![pole(0.0, 0.0, 1000.0, 50.0)],
            scale: 5,
        }
        .apply(&source, &mut target);

        // (1, 1) is displaced by 1·50·sin(π/1000) ≈ 0.157: stays inside.
        assert_eq!(target.get(1, 1), Some(INK.0));
        // (9, 9): r = 81, offset ≈ 9·50·0.254 ≈ 114 → off-canvas → background.
        assert_eq!(target.get(9, 9), Some(BG.0));
    }
}
