//! # Colors
//!
//! [`ColorSpec`] is the RGB value behind every palette slot. It is built from
//! a hex string (`#RGB` or `#RRGGBB`) or from decimal channels, which are
//! clamped into `0..=255` rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CaptchaError, Result};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct ColorSpec {
    red: u8,
    green: u8,
    blue: u8,
}

impl ColorSpec {
    pub const WHITE: ColorSpec = ColorSpec::new(0xFF, 0xFF, 0xFF);

    /// Default ink for text, lines, noise and signature.
    pub const GRAY: ColorSpec = ColorSpec::new(0x61, 0x61, 0x61);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#RGB` or `#RRGGBB` (hex digits in any case).
    ///
    /// Shorthand doubles each nibble, so `#F0A` is `#FF00AA`.
    pub fn from_hex(text: &str) -> Result<Self> {
        let invalid = || CaptchaError::InvalidColorFormat(text.to_string());

        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| -> Result<u8> {
            u8::from_str_radix(&digits[i..=i], 16).map_err(|_| invalid())
        };
        let byte = |i: usize| -> Result<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => Ok(Self::new(
                nibble(0)? * 0x11,
                nibble(1)? * 0x11,
                nibble(2)? * 0x11,
            )),
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?)),
            _ => Err(invalid()),
        }
    }

    /// Build from decimal channels, clamping each into `0..=255`.
    pub fn from_rgb(red: i64, green: i64, blue: i64) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

#[inline]
fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

impl FromStr for ColorSpec {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<ColorSpec> for String {
    fn from(color: ColorSpec) -> Self {
        color.to_hex()
    }
}

/// Accepted JSON shapes for a color.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Array([i64; 3]),
    Channels { red: i64, green: i64, blue: i64 },
}

impl TryFrom<ColorRepr> for ColorSpec {
    type Error = CaptchaError;

    fn try_from(repr: ColorRepr) -> Result<Self> {
        match repr {
            ColorRepr::Hex(text) => Self::from_hex(&text),
            ColorRepr::Array([r, g, b]) => Ok(Self::from_rgb(r, g, b)),
            ColorRepr::Channels { red, green, blue } => Ok(Self::from_rgb(red, green, blue)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shorthand_matches_long_form() {
        let short = ColorSpec::from_hex("#FFF").unwrap();
        let long = ColorSpec::from_hex("#FFFFFF").unwrap();
        assert_eq!(short, long);
        assert_eq!((short.red(), short.green(), short.blue()), (255, 255, 255));
    }

    #[test]
    fn test_shorthand_doubles_nibbles() {
        let c = ColorSpec::from_hex("#a3C").unwrap();
        assert_eq!(c, ColorSpec::new(0xAA, 0x33, 0xCC));
    }

    #[test]
    fn test_long_form_mixed_case() {
        let c = ColorSpec::from_hex("#53c7F2").unwrap();
        assert_eq!(c, ColorSpec::new(0x53, 0xC7, 0xF2));
        assert_eq!(c.to_hex(), "#53C7F2");
    }

    #[test]
    fn test_rejects_malformed_hex() {
        for bad in ["#12", "#1234567", "ABCDEF", "#GGG", "", "#", " #FFF", "#FFF ", "#+1F"] {
            let err = ColorSpec::from_hex(bad).unwrap_err();
            assert!(
                matches!(err, CaptchaError::InvalidColorFormat(ref s) if s == bad),
                "{bad:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_non_ascii_is_rejected_not_panicking() {
        assert!(ColorSpec::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_from_rgb_clamps() {
        assert_eq!(ColorSpec::from_rgb(-5, 300, 128), ColorSpec::new(0, 255, 128));
        assert_eq!(ColorSpec::from_rgb(0, 255, 7), ColorSpec::new(0, 255, 7));
    }

    #[test]
    fn test_from_str_and_display() {
        let c: ColorSpec = "#616161".parse().unwrap();
        assert_eq!(c, ColorSpec::GRAY);
        assert_eq!(c.to_string(), "#616161");
    }

    #[test]
    fn test_deserialize_shapes() {
        let hex: ColorSpec = serde_json::from_str("\"#fff\"").unwrap();
        let array: ColorSpec = serde_json::from_str("[255, 300, -1]").unwrap();
        let object: ColorSpec =
            serde_json::from_str(r#"{"red": 1, "green": 2, "blue": 3}"#).unwrap();
        assert_eq!(hex, ColorSpec::WHITE);
        assert_eq!(array, ColorSpec::new(255, 255, 0));
        assert_eq!(object, ColorSpec::new(1, 2, 3));
        assert!(serde_json::from_str::<ColorSpec>("\"white\"").is_err());
    }

    #[test]
    fn test_serialize_as_hex() {
        let json = serde_json::to_string(&ColorSpec::new(0x53, 0xC7, 0xF2)).unwrap();
        assert_eq!(json, "\"#53C7F2\"");
    }
}
