//! Rotor geometry.
//!
//! A geometry fixes the width of every key row (`block_length`) and the
//! per-block step of each row (`row_increments`). The number of rows is the
//! number of increments. The production geometry is 7 rows of 19 letters
//! stepping at the first seven primes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepperError};

/// Number of letters in each key row and in each text block.
pub const BLOCK_LENGTH: usize = 19;

/// Number of key rows.
pub const BLOCK_COUNT: usize = 7;

/// Per-block step of each key row, top row first.
pub const ROW_INCREMENTS: [usize; BLOCK_COUNT] = [2, 3, 5, 7, 11, 13, 17];

/// Number of letters in a normalized key.
pub const KEY_LENGTH: usize = BLOCK_COUNT * BLOCK_LENGTH;

/// Size of the letter alphabet.
pub const ALPHABET_SIZE: u8 = 26;

/// Key matrix dimensions and rotor gear ratios.
///
/// Every value is validated on construction, including when deserialized,
/// so a `StepperConfig` in hand always describes a usable geometry.
///
/// # Examples
///
/// ```
/// use stepper::config::StepperConfig;
///
/// let cfg = StepperConfig::default();
/// assert_eq!(cfg.block_count(), 7);
/// assert_eq!(cfg.key_length(), 133);
///
/// let small = StepperConfig::new(3, vec![1, 1]).unwrap();
/// assert_eq!(small.key_length(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStepperConfig")]
pub struct StepperConfig {
    block_length: usize,
    row_increments: Vec<usize>,
}

/// Unvalidated wire form of [`StepperConfig`].
#[derive(Deserialize)]
struct RawStepperConfig {
    block_length: usize,
    row_increments: Vec<usize>,
}

impl TryFrom<RawStepperConfig> for StepperConfig {
    type Error = StepperError;

    fn try_from(raw: RawStepperConfig) -> Result<Self> {
        StepperConfig::new(raw.block_length, raw.row_increments)
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        StepperConfig {
            block_length: BLOCK_LENGTH,
            row_increments: ROW_INCREMENTS.to_vec(),
        }
    }
}

impl StepperConfig {
    /// Creates and validates a geometry.
    ///
    /// # Parameters
    /// - `block_length`: Width of each key row and text block (at least 1).
    /// - `row_increments`: One step size per key row, top row first.
    ///
    /// # Errors
    /// Returns [`StepperError::InvalidConfig`] if the block length is zero,
    /// there are no rows, or the closed-form modulus overflows a `u64`.
    pub fn new(block_length: usize, row_increments: Vec<usize>) -> Result<Self> {
        let cfg = StepperConfig {
            block_length,
            row_increments,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the geometry invariants.
    ///
    /// # Errors
    /// Returns [`StepperError::InvalidConfig`] describing the first
    /// violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.block_length == 0 {
            return Err(StepperError::InvalidConfig(
                "block length must be at least 1",
            ));
        }
        if self.row_increments.is_empty() {
            return Err(StepperError::InvalidConfig(
                "at least one row increment is required",
            ));
        }
        if self.checked_period_modulus().is_none() {
            return Err(StepperError::InvalidConfig(
                "closed-form modulus does not fit in 64 bits",
            ));
        }
        Ok(())
    }

    /// Width of each key row and each text block.
    pub fn block_length(&self) -> usize {
        self.block_length
    }

    /// Number of key rows.
    pub fn block_count(&self) -> usize {
        self.row_increments.len()
    }

    /// Per-block step of each key row, top row first.
    pub fn row_increments(&self) -> &[usize] {
        &self.row_increments
    }

    /// Number of letters a normalized key must contain.
    pub fn key_length(&self) -> usize {
        self.block_count() * self.block_length
    }

    /// Wrap-around bound for closed-form positions:
    /// `block_length ^ block_count * block_count`.
    pub fn period_modulus(&self) -> u64 {
        // validated on construction
        self.checked_period_modulus().unwrap_or(u64::MAX)
    }

    fn checked_period_modulus(&self) -> Option<u64> {
        let base = u64::try_from(self.block_length).ok()?;
        let rows = u32::try_from(self.block_count()).ok()?;
        base.checked_pow(rows)?
            .checked_mul(u64::try_from(self.block_count()).ok()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let cfg = StepperConfig::default();
        assert_eq!(cfg.block_length(), 19);
        assert_eq!(cfg.block_count(), 7);
        assert_eq!(cfg.row_increments(), &[2, 3, 5, 7, 11, 13, 17]);
        assert_eq!(cfg.key_length(), KEY_LENGTH);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_period_modulus() {
        // 19^7 = 893_871_739
        assert_eq!(StepperConfig::default().period_modulus(), 893_871_739 * 7);
    }

    #[test]
    fn test_small_geometry() {
        let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
        assert_eq!(cfg.block_count(), 2);
        assert_eq!(cfg.key_length(), 6);
        assert_eq!(cfg.period_modulus(), 18);
    }

    #[test]
    fn test_zero_block_length_rejected() {
        assert!(matches!(
            StepperConfig::new(0, vec![1]),
            Err(StepperError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_no_rows_rejected() {
        assert!(matches!(
            StepperConfig::new(19, Vec::new()),
            Err(StepperError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overflowing_modulus_rejected() {
        assert!(matches!(
            StepperConfig::new(1000, vec![1; 8]),
            Err(StepperError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip_keeps_geometry() {
        let cfg = StepperConfig::new(5, vec![1, 2, 3]).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"block_length":5,"row_increments":[1,2,3]}"#);
        let back: StepperConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_deserialize_rejects_invalid_geometry() {
        let err = serde_json::from_str::<StepperConfig>(r#"{"block_length":0,"row_increments":[1]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("block length must be at least 1"));

        let err = serde_json::from_str::<StepperConfig>(r#"{"block_length":19,"row_increments":[]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("at least one row increment"));
    }
}
