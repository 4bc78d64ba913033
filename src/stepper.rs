//! Stepper: whole-text cipher pipeline.
//!
//! Ties the components together: letters go through the rotor engine,
//! digits through the side-channel cipher, and everything else is carried
//! through the side channel untouched.
//!
//! ```text
//! text ──fold──▶ extract_letters ──▶ letter codes ──segment──▶ CipherEngine ──┐
//!                      │                                                       ├──▶ merge ──▶ text
//!                      └──────────▶ side channel ──▶ side_channel::encode ─────┘
//! ```

use zeroize::Zeroize;

use crate::alphabet::{codes_from_letters, extract_letters, SideChannel};
use crate::config::StepperConfig;
use crate::engine::CipherEngine;
use crate::error::{Result, StepperError};
use crate::key_matrix::KeyMatrix;
use crate::normalize::{fold_diacritics, PunctuationMode};
use crate::recombine::merge;
use crate::segment::{flatten, segment};
use crate::side_channel;

/// Keyed cipher instance.
///
/// Holds the geometry, the key matrix, and the flat key letters used by the
/// digit side channel. Key material is cleared on drop.
///
/// # Examples
///
/// ```
/// use stepper::Stepper;
/// use stepper::normalize::PunctuationMode;
///
/// let key = "b".repeat(133);
/// let stepper = Stepper::new(&key).unwrap();
///
/// let ct = stepper.encrypt_str("Attack at 0600!", PunctuationMode::Keep).unwrap();
/// assert_eq!(ct, "haahjr ha 2822!");
/// assert_eq!(stepper.decrypt_str(&ct).unwrap(), "attack at 0600!");
/// ```
pub struct Stepper {
    config: StepperConfig,
    key: KeyMatrix,
    key_letters: Vec<u8>,
}

impl Stepper {
    /// Creates a cipher over the production geometry.
    ///
    /// # Parameters
    /// - `normalized_key`: Exactly 133 ASCII letters, see
    ///   [`normalize_key`](crate::normalize::normalize_key).
    ///
    /// # Errors
    /// - [`StepperError::InvalidKeyCharacter`] if the key holds a non-letter.
    /// - [`StepperError::InvalidKeyLength`] if the key is not 133 letters.
    pub fn new(normalized_key: &str) -> Result<Self> {
        Self::with_config(StepperConfig::default(), normalized_key)
    }

    /// Creates a cipher over a custom geometry.
    ///
    /// # Errors
    /// Same as [`new`](Self::new), against `config.key_length()`.
    pub fn with_config(config: StepperConfig, normalized_key: &str) -> Result<Self> {
        let mut key_letters = codes_from_letters(normalized_key)?;
        match KeyMatrix::build(&key_letters, &config) {
            Ok(key) => Ok(Stepper {
                config,
                key,
                key_letters,
            }),
            Err(e) => {
                key_letters.zeroize();
                Err(e)
            }
        }
    }

    /// Geometry this cipher runs on.
    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Encrypts letter codes and the side channel that accompanies them.
    ///
    /// An empty side channel stands for letters-only text.
    ///
    /// # Errors
    /// - [`StepperError::InvalidLetterCode`] if any code exceeds 25.
    /// - [`StepperError::SideChannelMismatch`] if a non-empty side channel
    ///   does not have one sentinel per letter.
    pub fn encrypt_text(
        &self,
        letter_codes: &[u8],
        side: &SideChannel,
    ) -> Result<(Vec<u8>, SideChannel)> {
        check_side(letter_codes.len(), side)?;
        let engine = CipherEngine::new(&self.key, &self.config)?;
        let blocks = segment(letter_codes, self.config.block_length())?;
        let cipher = engine.encrypt(&blocks)?;
        let side = side_channel::encode(side, &self.key_letters)?;
        Ok((flatten(&cipher), side))
    }

    /// Inverse of [`encrypt_text`](Self::encrypt_text).
    ///
    /// # Parameters
    /// - `original_length`: Number of letters in the plaintext. Must match
    ///   `cipher_codes.len()`.
    ///
    /// # Errors
    /// - [`StepperError::LengthMismatch`] if `original_length` differs from
    ///   the number of cipher letters.
    /// - Otherwise as [`encrypt_text`](Self::encrypt_text).
    pub fn decrypt_text(
        &self,
        cipher_codes: &[u8],
        side: &SideChannel,
        original_length: usize,
    ) -> Result<(Vec<u8>, SideChannel)> {
        check_side(cipher_codes.len(), side)?;
        let engine = CipherEngine::new(&self.key, &self.config)?;
        let blocks = segment(cipher_codes, self.config.block_length())?;
        let plain = engine.decrypt(&blocks, original_length)?;
        let side = side_channel::decode(side, &self.key_letters)?;
        Ok((flatten(&plain), side))
    }

    /// Encrypts a whole text.
    ///
    /// Diacritics are folded and `mode` is applied before ciphering; letters
    /// come out lowercase.
    ///
    /// # Errors
    /// Propagates component errors; none occur for well-formed input.
    pub fn encrypt_str(&self, text: &str, mode: PunctuationMode) -> Result<String> {
        let prepared = mode.prepare(&fold_diacritics(text));
        let (codes, side) = extract_letters(&prepared);
        let (cipher, side) = self.encrypt_text(&codes, &side)?;
        Ok(mode.finish(merge(&cipher, &side)?))
    }

    /// Decrypts a whole text produced by [`encrypt_str`](Self::encrypt_str).
    ///
    /// Diacritics are folded first, as on encryption. The plaintext length
    /// is the number of letters in the folded text.
    pub fn decrypt_str(&self, text: &str) -> Result<String> {
        let (codes, side) = extract_letters(&fold_diacritics(text));
        let (plain, side) = self.decrypt_text(&codes, &side, codes.len())?;
        merge(&plain, &side)
    }
}

impl std::fmt::Debug for Stepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stepper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for Stepper {
    fn drop(&mut self) {
        self.key_letters.zeroize();
    }
}

fn check_side(letters: usize, side: &SideChannel) -> Result<()> {
    if side.is_empty() || side.letter_slots() == letters {
        Ok(())
    } else {
        Err(StepperError::SideChannelMismatch {
            letters,
            slots: side.letter_slots(),
        })
    }
}

/// Encrypts with the production geometry.
///
/// # Errors
/// See [`Stepper::new`] and [`Stepper::encrypt_text`].
pub fn encrypt_text(
    letter_codes: &[u8],
    side: &SideChannel,
    normalized_key: &str,
) -> Result<(Vec<u8>, SideChannel)> {
    Stepper::new(normalized_key)?.encrypt_text(letter_codes, side)
}

/// Decrypts with the production geometry.
///
/// # Errors
/// See [`Stepper::new`] and [`Stepper::decrypt_text`].
pub fn decrypt_text(
    cipher_codes: &[u8],
    side: &SideChannel,
    normalized_key: &str,
    original_length: usize,
) -> Result<(Vec<u8>, SideChannel)> {
    Stepper::new(normalized_key)?.decrypt_text(cipher_codes, side, original_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEY_LENGTH;

    fn mixed_key() -> String {
        (0..KEY_LENGTH)
            .map(|i| (b'a' + ((i * 11 + 5) % 26) as u8) as char)
            .collect()
    }

    #[test]
    fn test_small_geometry_text() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        let stepper = Stepper::with_config(cfg, "abcbca").unwrap();
        let (ct, side) = stepper
            .encrypt_text(&[0, 1, 2, 3, 4], &SideChannel::default())
            .unwrap();
        assert_eq!(ct, vec![1, 4, 4, 6, 6]);
        assert!(side.is_empty());

        let (pt, _) = stepper.decrypt_text(&ct, &side, 5).unwrap();
        assert_eq!(pt, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_identity_key() {
        let stepper = Stepper::new(&"a".repeat(KEY_LENGTH)).unwrap();
        let ct = stepper
            .encrypt_str("Hello, World 42", PunctuationMode::Keep)
            .unwrap();
        assert_eq!(ct, "hello, world 42");
    }

    #[test]
    fn test_roundtrip_text() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        let text = "The quick brown fox, 3 times, jumps over 17 lazy dogs!";
        let ct = stepper.encrypt_str(text, PunctuationMode::Keep).unwrap();
        assert_ne!(ct, text.to_lowercase());
        assert_eq!(ct.chars().count(), text.chars().count());
        assert_eq!(stepper.decrypt_str(&ct).unwrap(), text.to_lowercase());
    }

    #[test]
    fn test_roundtrip_folds_diacritics() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        let ct = stepper
            .encrypt_str("Señor Müller café", PunctuationMode::Keep)
            .unwrap();
        assert_eq!(stepper.decrypt_str(&ct).unwrap(), "senor muller cafe");
    }

    #[test]
    fn test_decrypt_folds_diacritics() {
        let stepper = Stepper::new(&"b".repeat(KEY_LENGTH)).unwrap();
        // e - 7 wraps to x
        assert_eq!(stepper.decrypt_str("é").unwrap(), "x");
        assert_eq!(stepper.decrypt_str("Ñó ²").unwrap(), "gh 0");
    }

    #[test]
    fn test_no_spaces_mode() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        let ct = stepper
            .encrypt_str("see you at noon, ok", PunctuationMode::NoSpaces)
            .unwrap();
        assert!(!ct.contains("  "));
        assert_eq!(stepper.decrypt_str(&ct).unwrap(), "seeyouatnoon, ok");
    }

    #[test]
    fn test_alphanumeric_mode() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        let ct = stepper
            .encrypt_str("a-b c!9", PunctuationMode::AlphanumericOnly)
            .unwrap();
        assert_eq!(ct.chars().count(), 4);
        assert!(ct.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(stepper.decrypt_str(&ct).unwrap(), "abc9");
    }

    #[test]
    fn test_empty_text() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        assert_eq!(stepper.encrypt_str("", PunctuationMode::Keep).unwrap(), "");
        assert_eq!(stepper.decrypt_str("").unwrap(), "");
    }

    #[test]
    fn test_side_channel_mismatch() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        let (_, side) = extract_letters("ab1");
        assert_eq!(
            stepper.encrypt_text(&[0], &side).unwrap_err(),
            StepperError::SideChannelMismatch {
                letters: 1,
                slots: 2
            }
        );
    }

    #[test]
    fn test_original_length_mismatch() {
        let stepper = Stepper::new(&mixed_key()).unwrap();
        assert!(matches!(
            stepper.decrypt_text(&[1, 2, 3], &SideChannel::default(), 4),
            Err(StepperError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_keys() {
        assert_eq!(
            Stepper::new("abc").unwrap_err(),
            StepperError::InvalidKeyLength {
                expected: 133,
                actual: 3
            }
        );
        assert_eq!(
            Stepper::new("ab3").unwrap_err(),
            StepperError::InvalidKeyCharacter('3')
        );
    }

    #[test]
    fn test_free_functions_match_instance() {
        let key = mixed_key();
        let (codes, side) = extract_letters("meet me at 9");
        let (ct, cside) = encrypt_text(&codes, &side, &key).unwrap();
        let (pt, pside) = decrypt_text(&ct, &cside, &key, codes.len()).unwrap();
        assert_eq!(pt, codes);
        assert_eq!(pside, side);
    }

    #[test]
    fn test_debug_hides_key() {
        let stepper = Stepper::new(&"q".repeat(KEY_LENGTH)).unwrap();
        let shown = format!("{:?}", stepper);
        assert!(shown.contains("Stepper"));
        assert!(!shown.contains("qqq"));
    }
}
