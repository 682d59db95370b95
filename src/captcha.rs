//! # Captcha Pipeline
//!
//! ## Architecture
//!
//! ```text
//! CaptchaConfig → Captcha::generate → final Canvas → encode → PNG/JPEG/GIF bytes
//!                      ↓
//!                1. allocate final (W×H) + working (W·s × H·s) canvases
//!                2. resolve palette
//!                3. background fill (+ optional image on final)
//!                4. generate code
//!                5. noise discs → working
//!                6. text → working (distorted) or final (straight)
//!                7. pole distortion: working → final
//!                8. wavy lines → final
//!                9. signature → final
//! ```
//!
//! Every stage draws its random parameters from the `Rng` handed to
//! [`Captcha::generate_with_rng`]; a seeded `StdRng` gives identical images.
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use scrawl::{Captcha, CaptchaConfig};
//!
//! let mut captcha = Captcha::new(CaptchaConfig::new(150, 60));
//! let secret = captcha
//!     .generate_with_rng(&mut StdRng::seed_from_u64(7))?
//!     .secret
//!     .clone();
//! let png = captcha.encode()?;
//! assert!(captcha.verify(&secret, &secret.to_lowercase()));
//! # assert!(!png.is_empty());
//! # Ok::<(), scrawl::CaptchaError>(())
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage, RgbaImage};
use rand::Rng;
use std::io::Cursor;
use tracing::debug;

use crate::background;
use crate::code::GeneratedCode;
use crate::config::{CaptchaConfig, ImageFormat, Palette};
use crate::error::{CaptchaError, Result};
use crate::obfuscate::{DistortionEngine, LineObfuscator, NoiseField};
use crate::raster::{Canvas, TextEngine};

/// Code text height as a fraction of the target canvas height.
const TEXT_SIZE_RATIO: f32 = 0.4;

/// Signature size in points.
const SIGNATURE_SIZE: f32 = 10.0;
/// Signature distance from the right edge.
const SIGNATURE_RIGHT_MARGIN: f32 = 5.0;
/// Signature baseline distance from the bottom edge.
const SIGNATURE_BOTTOM_MARGIN: i32 = 3;

/// One captcha: configuration plus the result of the last successful run.
#[derive(Debug)]
pub struct Captcha {
    config: CaptchaConfig,
    code: Option<GeneratedCode>,
    image: Option<RgbaImage>,
}

impl Captcha {
    pub fn new(config: CaptchaConfig) -> Self {
        Self {
            config,
            code: None,
            image: None,
        }
    }

    pub fn config(&self) -> &CaptchaConfig {
        &self.config
    }

    /// Code of the last successful generation.
    pub fn code(&self) -> Option<&GeneratedCode> {
        self.code.as_ref()
    }

    /// Final canvas of the last successful generation.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Generate with the thread-local random source.
    pub fn generate(&mut self) -> Result<&GeneratedCode> {
        self.generate_with_rng(&mut rand::rng())
    }

    /// Run the full pipeline with `rng` as the only source of randomness.
    ///
    /// Any previous result is discarded first, so a failed run leaves nothing
    /// to encode.
    pub fn generate_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&GeneratedCode> {
        self.code = None;
        self.image = None;

        let (image, code) = render(&self.config, rng)?;
        self.image = Some(image);
        Ok(self.code.insert(code))
    }

    /// Encode the last generated image in the configured format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_as(self.config.image_format)
    }

    /// Encode the last generated image as `format`.
    pub fn encode_as(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let image = self.image.as_ref().ok_or(CaptchaError::NotGenerated)?;
        encode_image(image, format, self.config.jpeg_quality)
    }

    /// Compare a stored secret with user input.
    ///
    /// Both sides are lowercased first unless the captcha is case sensitive.
    pub fn verify(&self, stored: &str, entered: &str) -> bool {
        verify_code(stored, entered, self.config.case_sensitive)
    }
}

/// Free-standing form of [`Captcha::verify`].
pub fn verify_code(stored: &str, entered: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        stored == entered
    } else {
        stored.to_lowercase() == entered.to_lowercase()
    }
}

/// The pipeline proper. Both canvases live only inside this call.
fn render<R: Rng + ?Sized>(
    config: &CaptchaConfig,
    rng: &mut R,
) -> Result<(RgbaImage, GeneratedCode)> {
    config.validate()?;

    let (width, height) = (config.image_width, config.image_height);
    let scale = config.scale;
    let mut canvas = Canvas::new(width, height);
    let mut working = Canvas::new(width * scale, height * scale);
    debug!(width, height, scale, "allocated canvases");

    let palette = config.palette();

    draw_background(config, &palette, &mut canvas, &mut working);

    let code = config.code_type.generate(rng, config.code_length);
    debug!(kind = %config.code_type, display = %code.display, "generated code");

    if config.noise_level > 0 {
        let noise = NoiseField::scatter(rng, config.noise_level, working.width(), working.height());
        debug!(discs = noise.discs.len(), "drawing noise");
        noise.draw(&mut working, palette.noise);
    }

    let font = config.font.load()?;
    let target = if config.distortion_enabled() {
        &mut working
    } else {
        &mut canvas
    };
    draw_centered_text(font.as_ref(), target, &palette, &code.display);

    if config.distortion_enabled() {
        let engine = DistortionEngine::random(rng, width, height, config.perturbation, scale);
        debug!(poles = ?engine.poles, "applying distortion");
        engine.apply(&working, &mut canvas);
    }

    if config.num_lines > 0 {
        let lines = LineObfuscator::random(rng, config.num_lines, width, height);
        debug!(lines = lines.lines.len(), "drawing lines");
        lines.draw(&mut canvas, palette.line);
    }

    if let Some(signature) = config.signature_text.as_deref().filter(|s| !s.is_empty()) {
        let signature_font = match &config.signature_font {
            Some(source) => source.load()?,
            None => font,
        };
        draw_signature(signature_font.as_ref(), &mut canvas, &palette, signature);
    }

    Ok((canvas.into_image(), code))
}

/// Flat fill on both canvases, then the optional image on the final one.
fn draw_background(
    config: &CaptchaConfig,
    palette: &Palette,
    canvas: &mut Canvas,
    working: &mut Canvas,
) {
    canvas.fill(palette.background);
    working.fill(palette.background);

    if let Some(path) = &config.background_image
        && let Some(image) = background::load(path)
    {
        debug!(path = %path.display(), "compositing background image");
        canvas.copy_resized(&image);
    }
}

/// Center `text` on `target` at 0.4× its height.
fn draw_centered_text(font: &dyn TextEngine, target: &mut Canvas, palette: &Palette, text: &str) {
    let (w, h) = (target.width() as f32, target.height() as f32);
    let size = h * TEXT_SIZE_RATIO;
    let bounds = font.measure(size, text);
    let (x, y) = bounds.centered_origin(w, h);
    debug!(size, x, y, "drawing code text");
    font.draw(target, size, x, y, palette.text, text);
}

/// Right-aligned signature just above the bottom edge.
fn draw_signature(font: &dyn TextEngine, canvas: &mut Canvas, palette: &Palette, text: &str) {
    let bounds = font.measure(SIGNATURE_SIZE, text);
    let x = (canvas.width() as f32 - bounds.width() - SIGNATURE_RIGHT_MARGIN) as i32;
    let y = canvas.height() as i32 - SIGNATURE_BOTTOM_MARGIN;
    debug!(x, y, "drawing signature");
    font.draw(canvas, SIGNATURE_SIZE, x, y, palette.signature, text);
}

/// Flatten to RGB (alpha dropped, not blended) and encode.
fn encode_image(image: &RgbaImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let rgb: RgbImage = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);

    let result = match format {
        ImageFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut cursor, jpeg_quality).encode_image(&rgb)
        }
        ImageFormat::Png => rgb.write_to(&mut cursor, image::ImageFormat::Png),
        ImageFormat::Gif => {
            DynamicImage::ImageRgb8(rgb)
                .to_rgba8()
                .write_to(&mut cursor, image::ImageFormat::Gif)
        }
    };
    result.map_err(|e| CaptchaError::Image(format!("Failed to encode {format}: {e}")))?;

    Ok(bytes)
}
