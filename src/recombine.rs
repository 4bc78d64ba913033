//! Recombiner: interleaves ciphered letters with the preserved side channel.

use crate::alphabet::{code_to_char, SideChannel};
use crate::error::{Result, StepperError};

/// Apostrophe-class marks: straight and curly apostrophes and backtick.
///
/// These are not reinserted while letters remain to be placed.
pub const APOSTROPHES: [char; 3] = ['\'', '\u{2019}', '`'];

/// Returns `true` for an apostrophe-class mark.
pub fn is_apostrophe(ch: char) -> bool {
    APOSTROPHES.contains(&ch)
}

/// Rebuilds text from letter codes and a side channel.
///
/// Walks the side channel slot by slot. A slot holding an original
/// character emits it; a sentinel slot emits the next letter, lowercase.
/// Apostrophe-class marks are skipped. Every skipped or emitted symbol
/// lengthens the walk by one, so all letters are placed. Symbols past the
/// walk are appended as they are.
///
/// # Errors
/// - [`StepperError::SideChannelMismatch`] if the number of sentinel slots
///   differs from the number of letters.
/// - [`StepperError::InvalidLetterCode`] if any code exceeds 25.
///
/// # Examples
///
/// ```
/// use stepper::alphabet::extract_letters;
/// use stepper::recombine::merge;
///
/// let (codes, side) = extract_letters("Abc, Def!");
/// assert_eq!(merge(&codes, &side).unwrap(), "abc, def!");
/// ```
pub fn merge(letter_codes: &[u8], side: &SideChannel) -> Result<String> {
    let slots = side.slots();
    let letter_slots = side.letter_slots();
    if letter_slots != letter_codes.len() {
        return Err(StepperError::SideChannelMismatch {
            letters: letter_codes.len(),
            slots: letter_slots,
        });
    }

    let mut output = String::with_capacity(slots.len());
    let mut letters = letter_codes.iter();
    let mut walk_len = letter_codes.len();
    let mut index = 0;

    while index < walk_len {
        match slots.get(index).copied().flatten() {
            Some(symbol) => {
                if !is_apostrophe(symbol) {
                    output.push(symbol);
                }
                walk_len += 1;
            }
            None => {
                // sentinel count was checked above
                if let Some(&code) = letters.next() {
                    output.push(code_to_char(code)?);
                }
            }
        }
        index += 1;
    }

    output.extend(slots.iter().skip(index).flatten());
    Ok(output)
}
