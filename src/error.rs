//! Error types for the Stepper library.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StepperError>;

/// Errors produced by the Stepper library.
///
/// Every operation fails fast at the boundary of the component that detects
/// the violation. Rotor state depends on absolute position, so no operation
/// attempts to recover or resume after an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepperError {
    /// Key does not hold the number of letters the operation requires.
    #[error("Key must contain exactly {expected} letters, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    /// Numeric value outside the letter range [0, 25].
    #[error("Letter code {0} is outside the valid range [0, 25]")]
    InvalidLetterCode(u8),
    /// Character handed to the digit cipher is not an ASCII digit.
    #[error("Glyph {0:?} is not an ASCII digit")]
    InvalidDigitGlyph(char),
    /// Key string contains a character that is not an ASCII letter.
    #[error("Key character {0:?} is not an ASCII letter")]
    InvalidKeyCharacter(char),
    /// Rotor geometry rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Declared text length does not match the blocks supplied.
    #[error("Expected {expected} letters, blocks hold {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Side channel letter slots do not line up with the letter codes.
    #[error("Side channel has {slots} letter slots for {letters} letters")]
    SideChannelMismatch { letters: usize, slots: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_key_length() {
        let err = StepperError::InvalidKeyLength {
            expected: 133,
            actual: 12,
        };
        assert_eq!(
            format!("{}", err),
            "Key must contain exactly 133 letters, got 12"
        );
    }

    #[test]
    fn test_display_invalid_letter_code() {
        let err = StepperError::InvalidLetterCode(26);
        assert_eq!(
            format!("{}", err),
            "Letter code 26 is outside the valid range [0, 25]"
        );
    }

    #[test]
    fn test_display_invalid_digit_glyph() {
        let err = StepperError::InvalidDigitGlyph('x');
        assert_eq!(format!("{}", err), "Glyph 'x' is not an ASCII digit");
    }

    #[test]
    fn test_display_invalid_config() {
        let err = StepperError::InvalidConfig("block length must be at least 1");
        assert_eq!(
            format!("{}", err),
            "Invalid configuration: block length must be at least 1"
        );
    }

    #[test]
    fn test_display_side_channel_mismatch() {
        let err = StepperError::SideChannelMismatch {
            letters: 4,
            slots: 3,
        };
        assert_eq!(
            format!("{}", err),
            "Side channel has 3 letter slots for 4 letters"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            StepperError::InvalidLetterCode(30),
            StepperError::InvalidLetterCode(30)
        );
        assert_ne!(
            StepperError::InvalidLetterCode(30),
            StepperError::InvalidDigitGlyph('3')
        );
    }

    #[test]
    fn test_error_clone() {
        let err = StepperError::LengthMismatch {
            expected: 5,
            actual: 4,
        };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
