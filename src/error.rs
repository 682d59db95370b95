//! # Error Types
//!
//! This module defines error types used throughout the scrawl library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for captcha operations
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Color string outside the `#RGB` / `#RRGGBB` grammar
    #[error("Invalid color format: [{0}]")]
    InvalidColorFormat(String),

    /// Output format name that is not jpeg, png or gif
    #[error("Invalid image format: [{0}]")]
    InvalidImageFormat(String),

    /// Font file could not be read or parsed
    #[error("Font resource unavailable: {}: {reason}", path.display())]
    FontResourceUnavailable { path: PathBuf, reason: String },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// `encode()` called before a successful `generate()`
    #[error("Captcha has not been generated")]
    NotGenerated,

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
