//! # Scrawl - Captcha Image Synthesis
//!
//! Scrawl renders challenge-response images: a short code drawn as
//! human-readable but machine-hostile text. It provides:
//!
//! - **Code generation**: random strings from an unambiguous alphabet, or
//!   small arithmetic expressions
//! - **Noise**: disc scatter on a supersampled working canvas
//! - **Distortion**: a three-pole radial warp that maps the working canvas
//!   down onto the output
//! - **Lines**: sinusoidal strokes across the output
//! - **Encoding**: PNG, JPEG or GIF bytes
//!
//! ## Quick Start
//!
//! ```no_run
//! use scrawl::{Captcha, CaptchaConfig, ColorSpec};
//!
//! let config = CaptchaConfig::new(150, 60)
//!     .with_text_color(ColorSpec::from_hex("#53C7F2")?)
//!     .with_num_lines(2);
//!
//! let mut captcha = Captcha::new(config);
//! let secret = captcha.generate()?.secret.clone();
//! std::fs::write("captcha.png", captcha.encode()?)?;
//!
//! // Later, with the user's answer:
//! let accepted = captcha.verify(&secret, "kd7mza");
//! println!("accepted: {accepted}");
//!
//! # Ok::<(), scrawl::CaptchaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`captcha`] | The generation pipeline, encoding and verification |
//! | [`config`] | Configuration, palette resolution, output formats |
//! | [`code`] | Secret/display code generators |
//! | [`color`] | RGB colors from hex or decimal |
//! | [`obfuscate`] | Noise, distortion and line generators |
//! | [`raster`] | Canvas and text engines |
//! | [`background`] | Optional background image loading |
//! | [`error`] | Error types |

pub mod background;
pub mod captcha;
pub mod code;
pub mod color;
pub mod config;
pub mod error;
pub mod obfuscate;
pub mod raster;

// Re-exports for convenience
pub use captcha::{Captcha, verify_code};
pub use code::{CodeKind, GeneratedCode};
pub use color::ColorSpec;
pub use config::{CaptchaConfig, ImageFormat};
pub use error::CaptchaError;
pub use raster::FontSource;
