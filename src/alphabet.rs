//! Letter codes and the non-letter side channel.
//!
//! Every ASCII letter of a text becomes a case-folded letter code
//! (`a = 0 … z = 25`). Every other character keeps its original position in
//! a [`SideChannel`] so it can be reinserted after the letters are ciphered.

use crate::config::ALPHABET_SIZE;
use crate::error::{Result, StepperError};

/// Returns the letter code of an ASCII letter, case-folded.
///
/// Non-ASCII letters (including accented ones) are not letters here; fold
/// them first with [`fold_diacritics`](crate::normalize::fold_diacritics).
pub fn letter_code(ch: char) -> Option<u8> {
    if ch.is_ascii_alphabetic() {
        Some(ch.to_ascii_lowercase() as u8 - b'a')
    } else {
        None
    }
}

/// Checks that `code` is a valid letter code.
///
/// # Errors
/// Returns [`StepperError::InvalidLetterCode`] if `code > 25`.
pub fn check_code(code: u8) -> Result<u8> {
    if code < ALPHABET_SIZE {
        Ok(code)
    } else {
        Err(StepperError::InvalidLetterCode(code))
    }
}

/// Maps a letter code back to its lowercase character.
///
/// # Errors
/// Returns [`StepperError::InvalidLetterCode`] if `code > 25`.
pub fn code_to_char(code: u8) -> Result<char> {
    Ok((b'a' + check_code(code)?) as char)
}

/// Converts a string of ASCII letters into letter codes.
///
/// # Errors
/// Returns [`StepperError::InvalidKeyCharacter`] on the first character that
/// is not an ASCII letter.
pub fn codes_from_letters(letters: &str) -> Result<Vec<u8>> {
    letters
        .chars()
        .map(|ch| letter_code(ch).ok_or(StepperError::InvalidKeyCharacter(ch)))
        .collect()
}

/// Positional record of the non-letter characters of a text.
///
/// Each slot is `None` where a letter stood and `Some(original)` where any
/// other character stood. The slot count equals the character count of the
/// text it was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideChannel {
    slots: Vec<Option<char>>,
}

impl SideChannel {
    /// Wraps raw slots.
    pub fn from_slots(slots: Vec<Option<char>>) -> Self {
        SideChannel { slots }
    }

    /// Returns the slots in text order.
    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// Consumes the side channel, returning its slots.
    pub fn into_slots(self) -> Vec<Option<char>> {
        self.slots
    }

    /// Number of slots (the length of the original text in characters).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the side channel has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of sentinel slots, i.e. positions that held a letter.
    pub fn letter_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Number of slots holding an original non-letter character.
    pub fn symbol_count(&self) -> usize {
        self.slots.len() - self.letter_slots()
    }
}

/// Splits `text` into letter codes and a side channel.
///
/// Letters are case-folded; every other character is recorded at its
/// position in the side channel and omitted from the codes.
///
/// # Examples
///
/// ```
/// use stepper::alphabet::extract_letters;
///
/// let (codes, side) = extract_letters("A b!");
/// assert_eq!(codes, vec![0, 1]);
/// assert_eq!(side.slots(), &[None, Some(' '), None, Some('!')]);
/// ```
pub fn extract_letters(text: &str) -> (Vec<u8>, SideChannel) {
    let mut codes = Vec::with_capacity(text.len());
    let mut slots = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match letter_code(ch) {
            Some(code) => {
                codes.push(code);
                slots.push(None);
            }
            None => slots.push(Some(ch)),
        }
    }
    (codes, SideChannel { slots })
}
