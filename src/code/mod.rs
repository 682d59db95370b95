//! # Code Generation
//!
//! A captcha carries two strings: the **secret** checked against user input
//! and the **display** text actually rendered. They are identical for
//! [`StringCode`] and differ for [`MathCode`], where the image shows an
//! expression and the secret is its result.
//!
//! | Kind | Display | Secret |
//! |------|---------|--------|
//! | `string` | `Kd7mZa` | `Kd7mZa` |
//! | `math` | `7 - 3` | `4` |

pub mod math;
pub mod string;

pub use math::MathCode;
pub use string::StringCode;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CaptchaError;

/// Secret/display pair produced once per generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Value the user's answer is checked against.
    pub secret: String,
    /// Text rendered into the image.
    pub display: String,
}

/// Which generator produces the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    /// Random characters from an unambiguous alphabet.
    #[default]
    #[serde(alias = "random", alias = "random-string")]
    String,
    /// Small arithmetic expression; the secret is the result.
    #[serde(alias = "arithmetic")]
    Math,
}

impl CodeKind {
    /// Produce a code. `length` only applies to [`CodeKind::String`].
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R, length: usize) -> GeneratedCode {
        match self {
            CodeKind::String => StringCode::generate(rng, length),
            CodeKind::Math => MathCode::generate(rng).into(),
        }
    }
}

impl FromStr for CodeKind {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "random" | "random-string" => Ok(CodeKind::String),
            "math" | "arithmetic" => Ok(CodeKind::Math),
            other => Err(CaptchaError::Config(format!("unknown code type '{other}'"))),
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::String => f.write_str("string"),
            CodeKind::Math => f.write_str("math"),
        }
    }
}
