//! Optional background image.
//!
//! The file's format is probed from its leading bytes, not its extension.
//! Only gif, jpeg and png are accepted. Every failure is reported as `None`
//! so the caller keeps its flat fill.

use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::{debug, warn};

/// Formats a background image may use.
const ACCEPTED: [ImageFormat; 3] = [ImageFormat::Gif, ImageFormat::Jpeg, ImageFormat::Png];

/// Decode the background at `path`, or `None` if it is unusable.
pub fn load(path: &Path) -> Option<DynamicImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "background image unreadable");
            return None;
        }
    };

    decode(&bytes).or_else(|| {
        warn!(path = %path.display(), "background image ignored");
        None
    })
}

/// Probe and decode in-memory image bytes.
pub fn decode(bytes: &[u8]) -> Option<DynamicImage> {
    let format = image::guess_format(bytes).ok()?;
    if !ACCEPTED.contains(&format) {
        debug!(?format, "unsupported background format");
        return None;
    }

    match image::load_from_memory_with_format(bytes, format) {
        Ok(image) => Some(image),
        Err(e) => {
            debug!(?format, error = %e, "background image failed to decode");
            None
        }
    }
}
