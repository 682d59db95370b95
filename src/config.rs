//! # Captcha Configuration
//!
//! [`CaptchaConfig`] holds every knob of a generation run. Build it in code
//! with [`CaptchaConfig::new`] and the `with_*` setters, or load it from JSON:
//!
//! ```json
//! {
//!   "imageWidth": 150,
//!   "imageHeight": 60,
//!   "numLines": 3,
//!   "codeType": "math",
//!   "textColor": "#53C7F2",
//!   "lineColor": [40, 40, 40],
//!   "imageFormat": "jpeg"
//! }
//! ```
//!
//! Only the dimensions are required; everything else has a default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::code::CodeKind;
use crate::color::ColorSpec;
use crate::error::{CaptchaError, Result};
use crate::raster::{FontSource, Paint};

pub const DEFAULT_SCALE: u32 = 5;
pub const DEFAULT_NUM_LINES: u32 = 2;
pub const DEFAULT_NOISE_LEVEL: u32 = 2;
pub const DEFAULT_PERTURBATION: f64 = 0.75;
pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
    Gif,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
        }
    }

    /// Format implied by a file name's extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ImageFormat {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            _ => Err(CaptchaError::InvalidImageFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for ImageFormat {
    type Error = CaptchaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ImageFormat> for String {
    fn from(format: ImageFormat) -> Self {
        format.to_string()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
        })
    }
}

/// The five paints of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Paint,
    pub text: Paint,
    pub line: Paint,
    pub noise: Paint,
    pub signature: Paint,
}

impl Palette {
    /// The RGB values that can appear in an encoded image.
    pub fn colors(&self) -> [ColorSpec; 5] {
        [
            self.background.color(),
            self.text.color(),
            self.line.color(),
            self.noise.color(),
            self.signature.color(),
        ]
    }
}

/// Everything a generation run reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaConfig {
    pub image_width: u32,
    pub image_height: u32,

    /// Working-canvas supersampling factor.
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_num_lines")]
    pub num_lines: u32,
    /// Noise discs per 125; values above 10 draw as 10.
    #[serde(default = "default_noise_level")]
    pub noise_level: u32,
    /// Pole amplitude multiplier; 0 draws the text straight onto the output.
    #[serde(default = "default_perturbation")]
    pub perturbation: f64,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default)]
    pub code_type: CodeKind,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub image_format: ImageFormat,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    #[serde(default)]
    pub background_color: Option<ColorSpec>,
    #[serde(default)]
    pub text_color: Option<ColorSpec>,
    #[serde(default)]
    pub line_color: Option<ColorSpec>,
    #[serde(default)]
    pub noise_color: Option<ColorSpec>,
    #[serde(default)]
    pub signature_color: Option<ColorSpec>,

    /// gif/jpeg/png stretched over the output; unreadable files are ignored.
    #[serde(default)]
    pub background_image: Option<PathBuf>,
    #[serde(default)]
    pub signature_text: Option<String>,

    #[serde(default)]
    pub font: FontSource,
    /// Font for the signature; the main font when unset.
    #[serde(default)]
    pub signature_font: Option<FontSource>,
}

fn default_scale() -> u32 {
    DEFAULT_SCALE
}

fn default_num_lines() -> u32 {
    DEFAULT_NUM_LINES
}

fn default_noise_level() -> u32 {
    DEFAULT_NOISE_LEVEL
}

fn default_perturbation() -> f64 {
    DEFAULT_PERTURBATION
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl CaptchaConfig {
    /// Defaults for a `width`×`height` captcha.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            scale: DEFAULT_SCALE,
            num_lines: DEFAULT_NUM_LINES,
            noise_level: DEFAULT_NOISE_LEVEL,
            perturbation: DEFAULT_PERTURBATION,
            code_length: DEFAULT_CODE_LENGTH,
            code_type: CodeKind::default(),
            case_sensitive: false,
            image_format: ImageFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            background_color: None,
            text_color: None,
            line_color: None,
            noise_color: None,
            signature_color: None,
            background_image: None,
            signature_text: None,
            font: FontSource::default(),
            signature_font: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CaptchaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values no captcha can be drawn with.
    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CaptchaError::Config(format!(
                "image dimensions must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.scale == 0 {
            return Err(CaptchaError::Config("scale must be at least 1".to_string()));
        }
        if self
            .image_width
            .checked_mul(self.scale)
            .zip(self.image_height.checked_mul(self.scale))
            .is_none()
        {
            return Err(CaptchaError::Config(format!(
                "working canvas {}x{} at scale {} is too large",
                self.image_width, self.image_height, self.scale
            )));
        }
        if !self.perturbation.is_finite() || self.perturbation < 0.0 {
            return Err(CaptchaError::Config(format!(
                "perturbation must be a non-negative number, got {}",
                self.perturbation
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CaptchaError::Config(format!(
                "jpeg quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Resolve unset colors: white background, `#616161` for the rest.
    ///
    /// Text, line and noise ink is translucent; background and signature are opaque.
    pub fn palette(&self) -> Palette {
        let or_gray = |c: Option<ColorSpec>| c.unwrap_or(ColorSpec::GRAY);
        Palette {
            background: Paint::opaque(self.background_color.unwrap_or(ColorSpec::WHITE)),
            text: Paint::translucent(or_gray(self.text_color)),
            line: Paint::translucent(or_gray(self.line_color)),
            noise: Paint::translucent(or_gray(self.noise_color)),
            signature: Paint::opaque(or_gray(self.signature_color)),
        }
    }

    /// Distortion runs only for a positive perturbation.
    pub fn distortion_enabled(&self) -> bool {
        self.perturbation > 0.0
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_num_lines(mut self, num_lines: u32) -> Self {
        self.num_lines = num_lines;
        self
    }

    pub fn with_noise_level(mut self, noise_level: u32) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn with_perturbation(mut self, perturbation: f64) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    pub fn with_code_type(mut self, code_type: CodeKind) -> Self {
        self.code_type = code_type;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_image_format(mut self, image_format: ImageFormat) -> Self {
        self.image_format = image_format;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_background_color(mut self, color: ColorSpec) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: ColorSpec) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn with_line_color(mut self, color: ColorSpec) -> Self {
        self.line_color = Some(color);
        self
    }

    pub fn with_noise_color(mut self, color: ColorSpec) -> Self {
        self.noise_color = Some(color);
        self
    }

    pub fn with_signature_color(mut self, color: ColorSpec) -> Self {
        self.signature_color = Some(color);
        self
    }

    pub fn with_background_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_image = Some(path.into());
        self
    }

    pub fn with_signature_text(mut self, text: impl Into<String>) -> Self {
        self.signature_text = Some(text.into());
        self
    }

    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    pub fn with_signature_font(mut self, font: FontSource) -> Self {
        self.signature_font = Some(font);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CaptchaConfig::new(150, 60);
        assert_eq!(config.scale, 5);
        assert_eq!(config.num_lines, 2);
        assert_eq!(config.noise_level, 2);
        assert_eq!(config.perturbation, 0.75);
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_type, CodeKind::String);
        assert!(!config.case_sensitive);
        assert_eq!(config.image_format, ImageFormat::Png);
        assert_eq!(config.font, FontSource::Builtin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_defaults_match_new() {
        let config =
            CaptchaConfig::from_json_str(r#"{"imageWidth": 150, "imageHeight": 60}"#).unwrap();
        assert_eq!(config, CaptchaConfig::new(150, 60));
    }

    #[test]
    fn test_json_full() {
        let json = r##"{
            "imageWidth": 200,
            "imageHeight": 80,
            "scale": 3,
            "numLines": 4,
            "noiseLevel": 0,
            "perturbation": 0,
            "codeLength": 5,
            "codeType": "math",
            "caseSensitive": true,
            "imageFormat": "GIF",
            "textColor": "#53C7F2",
            "lineColor": [300, 0, 10],
            "noiseColor": {"red": 1, "green": 2, "blue": 3},
            "backgroundImage": "/tmp/bg.png",
            "signatureText": "example.com",
            "font": "/fonts/bold.ttf"
        }"##;
        let config = CaptchaConfig::from_json_str(json).unwrap();
        let expected = CaptchaConfig::new(200, 80)
            .with_scale(3)
            .with_num_lines(4)
            .with_noise_level(0)
            .with_perturbation(0.0)
            .with_code_length(5)
            .with_code_type(CodeKind::Math)
            .with_case_sensitive(true)
            .with_image_format(ImageFormat::Gif)
            .with_text_color(ColorSpec::new(0x53, 0xC7, 0xF2))
            .with_line_color(ColorSpec::new(255, 0, 10))
            .with_noise_color(ColorSpec::new(1, 2, 3))
            .with_background_image("/tmp/bg.png")
            .with_signature_text("example.com")
            .with_font(FontSource::File(PathBuf::from("/fonts/bold.ttf")));
        assert_eq!(config, expected);
    }

    #[test]
    fn test_json_missing_dimensions() {
        let err = CaptchaConfig::from_json_str(r#"{"imageWidth": 150}"#).unwrap_err();
        assert!(matches!(err, CaptchaError::Config(_)));
    }

    #[test]
    fn test_json_bad_color_and_format() {
        let bad_color = r#"{"imageWidth": 1, "imageHeight": 1, "textColor": "616161"}"#;
        assert!(CaptchaConfig::from_json_str(bad_color).is_err());

        let bad_format = r#"{"imageWidth": 1, "imageHeight": 1, "imageFormat": "bmp"}"#;
        let err = CaptchaConfig::from_json_str(bad_format).unwrap_err();
        assert!(err.to_string().contains("bmp"), "{err}");
    }

    #[test]
    fn test_validate_rejects() {
        assert!(CaptchaConfig::new(0, 60).validate().is_err());
        assert!(CaptchaConfig::new(150, 60).with_scale(0).validate().is_err());
        assert!(CaptchaConfig::new(150, 60).with_perturbation(-1.0).validate().is_err());
        assert!(CaptchaConfig::new(150, 60).with_perturbation(f64::NAN).validate().is_err());
        assert!(CaptchaConfig::new(150, 60).with_jpeg_quality(0).validate().is_err());
        assert!(CaptchaConfig::new(u32::MAX, 60).validate().is_err());
    }

    #[test]
    fn test_palette_defaults() {
        let palette = CaptchaConfig::new(150, 60).palette();
        assert_eq!(palette.background, Paint::opaque(ColorSpec::WHITE));
        assert_eq!(palette.text, Paint::translucent(ColorSpec::GRAY));
        assert_eq!(palette.line, Paint::translucent(ColorSpec::GRAY));
        assert_eq!(palette.noise, Paint::translucent(ColorSpec::GRAY));
        assert_eq!(palette.signature, Paint::opaque(ColorSpec::GRAY));
    }

    #[test]
    fn test_palette_overrides() {
        let red = ColorSpec::new(255, 0, 0);
        let palette = CaptchaConfig::new(150, 60)
            .with_text_color(red)
            .with_background_color(ColorSpec::new(0, 0, 0))
            .palette();
        assert_eq!(palette.text.color(), red);
        assert_eq!(palette.background.color(), ColorSpec::new(0, 0, 0));
        assert_eq!(palette.line.color(), ColorSpec::GRAY);
    }

    #[test]
    fn test_image_format_parse() {
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        let err = "webp".parse::<ImageFormat>().unwrap_err();
        assert!(matches!(err, CaptchaError::InvalidImageFormat(ref s) if s == "webp"));
    }

    #[test]
    fn test_image_format_metadata() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Gif.extension(), "gif");
        assert_eq!(ImageFormat::from_path(Path::new("out/c.JPEG")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("out/c")), None);
    }
}
