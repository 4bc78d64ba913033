//! SideChannelCipher: Vigenère-style shift of the digits kept in the side
//! channel.
//!
//! Digits are the ten "letters" of this sub-cipher. The i-th digit met, left
//! to right, is shifted twice by the value of key letter `i mod key_len`.
//! The doubled shift is part of the ciphertext format and must be kept as
//! two separate modular steps.

use crate::alphabet::{check_code, SideChannel};
use crate::error::{Result, StepperError};

/// Direction of a digit shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// Shifts one digit glyph by `key_value` twice in `direction`.
///
/// # Errors
/// Returns [`StepperError::InvalidDigitGlyph`] if `glyph` is not `'0'..='9'`.
///
/// # Examples
///
/// ```
/// use stepper::side_channel::{shift_digit, Direction};
///
/// // 7 + 2*4 = 15 -> 5
/// assert_eq!(shift_digit('7', 4, Direction::Encode).unwrap(), '5');
/// assert_eq!(shift_digit('5', 4, Direction::Decode).unwrap(), '7');
/// ```
pub fn shift_digit(glyph: char, key_value: u8, direction: Direction) -> Result<char> {
    if !glyph.is_ascii_digit() {
        return Err(StepperError::InvalidDigitGlyph(glyph));
    }
    let digit = (glyph as u8 - b'0') as i32;
    let k = key_value as i32;
    let shifted = match direction {
        Direction::Encode => {
            let once = (digit + k) % 10;
            (once + k) % 10
        }
        Direction::Decode => {
            let once = (digit - k).rem_euclid(10);
            (once - k).rem_euclid(10)
        }
    };
    Ok((b'0' + shifted as u8) as char)
}

/// Encodes every digit slot of `side` with `key` letter codes.
///
/// Non-digit slots and letter sentinels pass through unchanged.
///
/// # Errors
/// - [`StepperError::InvalidLetterCode`] if any key value exceeds 25.
/// - [`StepperError::InvalidKeyLength`] if `key` is empty while the side
///   channel holds at least one digit.
pub fn encode(side: &SideChannel, key: &[u8]) -> Result<SideChannel> {
    transform(side, key, Direction::Encode)
}

/// Inverse of [`encode`].
///
/// # Errors
/// Same as [`encode`].
pub fn decode(side: &SideChannel, key: &[u8]) -> Result<SideChannel> {
    transform(side, key, Direction::Decode)
}

fn transform(side: &SideChannel, key: &[u8], direction: Direction) -> Result<SideChannel> {
    for &value in key {
        check_code(value)?;
    }
    let mut key_cycle = key.iter().copied().cycle();
    let mut slots = Vec::with_capacity(side.len());
    for &slot in side.slots() {
        match slot {
            Some(glyph) if glyph.is_ascii_digit() => {
                let key_value = key_cycle.next().ok_or(StepperError::InvalidKeyLength {
                    expected: 1,
                    actual: 0,
                })?;
                slots.push(Some(shift_digit(glyph, key_value, direction)?));
            }
            other => slots.push(other),
        }
    }
    Ok(SideChannel::from_slots(slots))
}
