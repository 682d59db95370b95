//! Wavy strokes across the final canvas.
//!
//! Each line is a straight segment with a sine wave riding perpendicular to
//! it. Points are sampled every half pixel of arc length and stamped as small
//! squares, so the stroke looks continuous at any angle.

use rand::Rng;
use std::f64::consts::{PI, TAU};

use super::{uniform_int, unit};
use crate::raster::{Canvas, Paint};

/// Arc length between samples.
pub const STEP: f64 = 0.5;

/// One generated stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavyLine {
    /// Start of the underlying straight segment.
    pub x0: f64,
    pub y0: f64,
    /// Direction of travel in radians from horizontal.
    pub theta: f64,
    /// Segment length in pixels.
    pub length: f64,
    /// Extra pixels per stamp; each stamp is `(stroke + 1)` wide.
    pub stroke: i32,
    /// Wave number along the segment.
    pub k: f64,
    pub amplitude: f64,
    pub phase: f64,
}

impl WavyLine {
    /// Random line for slot `index` of `count` on a `width`×`height` canvas.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        index: u32,
        count: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let (w, h) = (width as f64, height as f64);
        let n = count as f64;

        // Evenly spaced anchors, each jittered by up to half a slot.
        let mut x = w * (1.0 + index as f64) / (n + 1.0);
        x += (0.5 - unit(rng)) * w / n;
        let y = uniform_int(rng, h * 0.1, h * 0.9) as f64;

        let theta = (unit(rng) - 0.5) * PI * 0.7;
        let length = uniform_int(rng, w * 0.4, w * 0.7) as f64;
        let stroke = rng.random_range(0..=2);

        let k = unit(rng) * 0.6 * 0.2;
        let k = k * k * 0.5;
        let phase = unit(rng) * TAU;
        let amplitude = 1.5 * unit(rng) / (k + 5.0 / length);

        Self {
            x0: x - 0.5 * length * theta.cos(),
            y0: y - 0.5 * length * theta.sin(),
            theta,
            length,
            stroke,
            k,
            amplitude,
            phase,
        }
    }

    /// Number of samples along the segment.
    pub fn samples(&self) -> usize {
        (self.length / STEP).ceil().max(0.0) as usize
    }

    /// Sampled centerline points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let dx = STEP * self.theta.cos();
        let dy = STEP * self.theta.sin();

        (0..self.samples()).map(move |i| {
            let t = i as f64;
            let wave = self.amplitude * (self.k * t * STEP + self.phase).sin();
            (self.x0 + t * dx + wave * dy, self.y0 + t * dy - wave * dx)
        })
    }

    /// Stamp each sample, its corner truncated toward zero.
    pub fn draw(&self, canvas: &mut Canvas, paint: Paint) {
        for (x, y) in self.points() {
            let (px, py) = (x as i32, y as i32);
            canvas.fill_rect(px, py, px + self.stroke, py + self.stroke, paint);
        }
    }
}

/// All lines of one captcha.
#[derive(Debug, Clone, Default)]
pub struct LineObfuscator {
    pub lines: Vec<WavyLine>,
}

impl LineObfuscator {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, count: u32, width: u32, height: u32) -> Self {
        let lines = (0..count)
            .map(|i| WavyLine::random(rng, i, count, width, height))
            .collect();
        Self { lines }
    }

    pub fn draw(&self, canvas: &mut Canvas, paint: Paint) {
        for line in &self.lines {
            line.draw(canvas, paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const INK: Paint = Paint(Rgba([97, 97, 97, 128]));

    #[test]
    fn test_random_parameter_ranges() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let obfuscator = LineObfuscator::random(&mut rng, 2, 150, 60);
            assert_eq!(obfuscator.lines.len(), 2);
            for line in &obfuscator.lines {
                assert!((60.0..=105.0).contains(&line.length), "{line:?}");
                assert!(line.theta.abs() <= 0.35 * PI, "{line:?}");
                assert!((0..=2).contains(&line.stroke));
                // (0.12)^2 * 0.5
                assert!((0.0..=0.0072).contains(&line.k), "{line:?}");
                assert!((0.0..TAU).contains(&line.phase));
                assert!(line.amplitude >= 0.0);
                assert!(line.amplitude <= 1.5 * line.length / 5.0);
            }
        }
    }

    #[test]
    fn test_anchor_is_segment_midpoint() {
        let mut rng = StdRng::seed_from_u64(4);
        let line = WavyLine::random(&mut rng, 0, 1, 200, 80);
        let mid_x = line.x0 + 0.5 * line.length * line.theta.cos();
        let mid_y = line.y0 + 0.5 * line.length * line.theta.sin();
        // Single line: slot at w/2, jitter within ±w/2.
        assert!((0.0..=200.0).contains(&mid_x));
        assert!((8.0..=72.0).contains(&mid_y));
    }

    #[test]
    fn test_flat_line_points() {
        let line = WavyLine {
            x0: 10.0,
            y0: 20.0,
            theta: 0.0,
            length: 4.0,
            stroke: 0,
            k: 0.0,
            amplitude: 0.0,
            phase: 0.0,
        };
        let points: Vec<_> = line.points().collect();
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], (10.0, 20.0));
        assert_eq!(points[7], (13.5, 20.0));
    }

    #[test]
    fn test_wave_is_perpendicular() {
        // Horizontal travel: the wave only moves y.
        let line = WavyLine {
            x0: 0.0,
            y0: 50.0,
            theta: 0.0,
            length: 20.0,
            stroke: 0,
            k: 0.0,
            amplitude: 4.0,
            phase: PI / 2.0,
        };
        for (i, (x, y)) in line.points().enumerate() {
            assert!((x - i as f64 * STEP).abs() < 1e-9);
            // wave·(dy, -dx) with dx = 0.5, dy = 0 → y shifts by -4·0.5
            assert!((y - 48.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_draw_stamps_squares() {
        let line = WavyLine {
            x0: 5.0,
            y0: 5.0,
            theta: 0.0,
            length: 1.0,
            stroke: 2,
            k: 0.0,
            amplitude: 0.0,
            phase: 0.0,
        };
        let mut canvas = Canvas::new(20, 20);
        line.draw(&mut canvas, INK);
        let inked = canvas.as_image().pixels().filter(|p| **p == INK.0).count();
        // Samples at x = 5.0 and 5.5 both truncate to 5: one 3x3 square.
        assert_eq!(inked, 9);
        assert_eq!(canvas.get(7, 7), Some(INK.0));
        assert_ne!(canvas.get(8, 7), Some(INK.0));
    }

    #[test]
    fn test_negative_coordinates_truncate_toward_zero() {
        let line = WavyLine {
            x0: -0.5,
            y0: -0.5,
            theta: 0.0,
            length: 0.5,
            stroke: 0,
            k: 0.0,
            amplitude: 0.0,
            phase: 0.0,
        };
        let mut canvas = Canvas::new(4, 4);
        line.draw(&mut canvas, INK);
        // -0.5 stamps at 0, not at -1 (which would clip away entirely).
        assert_eq!(canvas.get(0, 0), Some(INK.0));
        let inked = canvas.as_image().pixels().filter(|p| **p == INK.0).count();
        assert_eq!(inked, 1);
    }

    #[test]
    fn test_zero_lines() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(LineObfuscator::random(&mut rng, 0, 150, 60).lines.is_empty());
    }
}
