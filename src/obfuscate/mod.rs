//! # Obfuscation Stages
//!
//! The three generators that make the code hard to machine-read:
//!
//! - [`noise`]: filled discs scattered over the supersampled working canvas
//! - [`distort`]: multi-pole radial warp from working canvas to final canvas
//! - [`lines`]: sinusoidal strokes over the final canvas
//!
//! Each generator draws all of its random parameters up front from a
//! caller-supplied [`Rng`], so the same seed always yields the same strokes.

pub mod distort;
pub mod lines;
pub mod noise;

pub use distort::{DistortionEngine, Pole};
pub use lines::{LineObfuscator, WavyLine};
pub use noise::{Disc, NoiseField};

use rand::Rng;

/// Integer uniform in `[lo, hi]` after truncating both bounds toward zero.
///
/// Fractional bounds such as `0.2 * width` are common here; the bounds are
/// swapped when `hi < lo`.
#[inline]
pub fn uniform_int<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> i64 {
    let (lo, hi) = (lo as i64, hi as i64);
    if lo <= hi {
        rng.random_range(lo..=hi)
    } else {
        rng.random_range(hi..=lo)
    }
}

/// Float uniform in `[0, 1)`.
#[inline]
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}
