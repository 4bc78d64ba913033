//! KeyMatrix: the fixed rows of key letters read by the rotor walk.
//!
//! A normalized key of exactly `block_count * block_length` letters is cut
//! into `block_count` rows of `block_length` letter codes. Row 0 is the
//! topmost row. The matrix never changes after construction; the rotor
//! scheduler "rotates" rows by moving read positions, not by moving letters.

use zeroize::Zeroize;

use crate::alphabet::{check_code, codes_from_letters};
use crate::config::StepperConfig;
use crate::error::{Result, StepperError};
use crate::segment::{segment, Block};

/// Immutable matrix of key rows.
pub struct KeyMatrix {
    rows: Vec<Block>,
}

impl KeyMatrix {
    /// Builds the matrix from normalized key letter codes.
    ///
    /// Padding short keys or truncating long ones is the caller's job, see
    /// [`normalize_key`](crate::normalize::normalize_key).
    ///
    /// # Parameters
    /// - `key_letters`: Letter codes of the normalized key.
    /// - `config`: Geometry giving the row count and width.
    ///
    /// # Errors
    /// - [`StepperError::InvalidKeyLength`] if `key_letters.len()` differs
    ///   from `config.key_length()`.
    /// - [`StepperError::InvalidLetterCode`] if any code exceeds 25.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepper::config::StepperConfig;
    /// use stepper::key_matrix::KeyMatrix;
    ///
    /// let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
    /// let km = KeyMatrix::build(&[0, 1, 2, 1, 2, 0], &cfg).unwrap();
    /// assert_eq!(km.row(1), &[1, 2, 0]);
    /// ```
    pub fn build(key_letters: &[u8], config: &StepperConfig) -> Result<Self> {
        if key_letters.len() != config.key_length() {
            return Err(StepperError::InvalidKeyLength {
                expected: config.key_length(),
                actual: key_letters.len(),
            });
        }
        for &code in key_letters {
            check_code(code)?;
        }
        let rows = segment(key_letters, config.block_length())?;
        Ok(KeyMatrix { rows })
    }

    /// Builds the matrix from a normalized key string of ASCII letters.
    ///
    /// # Errors
    /// - [`StepperError::InvalidKeyCharacter`] on a non-letter.
    /// - [`StepperError::InvalidKeyLength`] as for [`build`](Self::build).
    pub fn from_key_str(key: &str, config: &StepperConfig) -> Result<Self> {
        let mut codes = codes_from_letters(key)?;
        let built = Self::build(&codes, config);
        codes.zeroize();
        built
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns row `k` (0 is topmost).
    ///
    /// # Panics
    /// Panics if `k >= row_count()`.
    pub fn row(&self, k: usize) -> &[u8] {
        &self.rows[k]
    }

    /// Returns the key letter of row `k` at read position `pos`.
    #[inline]
    pub fn digit(&self, k: usize, pos: usize) -> u8 {
        self.rows[k][pos]
    }
}

impl std::fmt::Debug for KeyMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMatrix")
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl Drop for KeyMatrix {
    /// Clears key material on drop.
    fn drop(&mut self) {
        for row in self.rows.iter_mut() {
            row.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEY_LENGTH;

    #[test]
    fn test_build_default_geometry() {
        let key: Vec<u8> = (0..KEY_LENGTH).map(|i| (i % 26) as u8).collect();
        let km = KeyMatrix::build(&key, &StepperConfig::default()).unwrap();
        assert_eq!(km.row_count(), 7);
        for k in 0..7 {
            assert_eq!(km.row(k).len(), 19);
        }
        // Row 1 starts at key index 19 -> 19 % 26 = 19
        assert_eq!(km.digit(1, 0), 19);
        assert_eq!(km.digit(6, 18), ((6 * 19 + 18) % 26) as u8);
    }

    #[test]
    fn test_build_rejects_short_key() {
        let key = vec![0u8; KEY_LENGTH - 1];
        assert_eq!(
            KeyMatrix::build(&key, &StepperConfig::default()).unwrap_err(),
            StepperError::InvalidKeyLength {
                expected: 133,
                actual: 132
            }
        );
    }

    #[test]
    fn test_build_rejects_long_key() {
        let key = vec![0u8; KEY_LENGTH + 1];
        assert!(matches!(
            KeyMatrix::build(&key, &StepperConfig::default()),
            Err(StepperError::InvalidKeyLength { .. })
        ));
    }

    #[test]
    fn test_build_rejects_bad_code() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        assert_eq!(
            KeyMatrix::build(&[0, 1, 2, 3, 4, 26], &cfg).unwrap_err(),
            StepperError::InvalidLetterCode(26)
        );
    }

    #[test]
    fn test_from_key_str() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        let km = KeyMatrix::from_key_str("abcBCA", &cfg).unwrap();
        assert_eq!(km.row(0), &[0, 1, 2]);
        assert_eq!(km.row(1), &[1, 2, 0]);
    }

    #[test]
    fn test_from_key_str_rejects_symbols() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        assert_eq!(
            KeyMatrix::from_key_str("abc de", &cfg).unwrap_err(),
            StepperError::InvalidKeyCharacter(' ')
        );
    }

    #[test]
    fn test_debug_hides_key_material() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        let km = KeyMatrix::from_key_str("zzzzzz", &cfg).unwrap();
        let shown = format!("{:?}", km);
        assert!(!shown.contains("25"));
    }
}
