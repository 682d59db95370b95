//! Random character codes.

use rand::Rng;

use super::GeneratedCode;

/// Glyphs that survive distortion without being mistaken for one another.
/// No `I`, `J`, `O`, `Q`, `X`, `0` or `1` (or their lowercase twins).
pub const ALPHABET: &[u8] = b"ABCDEFGHKLMNPRSTUVWYZabcdefghklmnprstuvwyz23456789";

/// Random-string generator. The secret is what gets drawn.
pub struct StringCode;

impl StringCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize) -> GeneratedCode {
        let code: String = (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();

        GeneratedCode {
            secret: code.clone(),
            display: code,
        }
    }
}
