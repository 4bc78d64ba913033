//! CipherEngine: forward and backward rotor walks over letter blocks.
//!
//! Encryption walks the text front to back. For every letter it adds the key
//! letter under each row's read position, top row to bottom row, then
//! advances every read position by one. Decryption retraces that exact path
//! in reverse: last block first, last letter first, bottom row first, with
//! read positions stepped back before each use. Its starting point is the
//! closed-form rotor state at the end of the text, so it never replays the
//! forward history.

use crate::alphabet::check_code;
use crate::config::{StepperConfig, ALPHABET_SIZE};
use crate::error::{Result, StepperError};
use crate::key_matrix::KeyMatrix;
use crate::rotor::{Positions, RotorScheduler};
use crate::segment::{check_shape, total_length, Block};

/// Block cipher driving a [`KeyMatrix`] with a [`RotorScheduler`].
///
/// Holds only immutable state; every call recomputes rotor positions from
/// absolute block indices.
pub struct CipherEngine<'k> {
    key: &'k KeyMatrix,
    scheduler: RotorScheduler,
}

impl<'k> CipherEngine<'k> {
    /// Creates an engine for `key` laid out per `config`.
    ///
    /// # Errors
    /// Returns [`StepperError::InvalidKeyLength`] if the matrix does not have
    /// `config.block_count()` rows of `config.block_length()` letters.
    pub fn new(key: &'k KeyMatrix, config: &StepperConfig) -> Result<Self> {
        let rows_fit = key.row_count() == config.block_count()
            && (0..key.row_count()).all(|k| key.row(k).len() == config.block_length());
        if !rows_fit {
            return Err(StepperError::InvalidKeyLength {
                expected: config.key_length(),
                actual: (0..key.row_count()).map(|k| key.row(k).len()).sum(),
            });
        }
        Ok(CipherEngine {
            key,
            scheduler: RotorScheduler::new(config),
        })
    }

    /// Returns the scheduler driving this engine.
    pub fn scheduler(&self) -> &RotorScheduler {
        &self.scheduler
    }

    /// Encrypts `blocks` front to back.
    ///
    /// # Parameters
    /// - `blocks`: Segmented plaintext letter codes.
    ///
    /// # Returns
    /// Ciphertext blocks of the same shape.
    ///
    /// # Errors
    /// - [`StepperError::InvalidLetterCode`] if any code exceeds 25.
    /// - [`StepperError::LengthMismatch`] if `blocks` is not a valid
    ///   segmentation (only the last block may be short).
    ///
    /// # Examples
    ///
    /// ```
    /// use stepper::config::StepperConfig;
    /// use stepper::engine::CipherEngine;
    /// use stepper::key_matrix::KeyMatrix;
    ///
    /// let cfg = StepperConfig::new(3, vec![1, 1]).unwrap();
    /// let key = KeyMatrix::build(&[0, 1, 2, 1, 2, 0], &cfg).unwrap();
    /// let engine = CipherEngine::new(&key, &cfg).unwrap();
    ///
    /// let ct = engine.encrypt(&[vec![0, 1, 2], vec![3, 4]]).unwrap();
    /// assert_eq!(ct, vec![vec![1, 4, 4], vec![6, 6]]);
    /// ```
    pub fn encrypt(&self, blocks: &[Block]) -> Result<Vec<Block>> {
        self.check_blocks(blocks)?;
        let block_length = self.scheduler.block_length();
        tracing::debug!(
            blocks = blocks.len(),
            letters = total_length(blocks),
            block_count = self.scheduler.rows(),
            "encrypting"
        );

        let mut output = Vec::with_capacity(blocks.len());
        for (block, (_, base)) in blocks.iter().zip(self.scheduler.blocks_forward()) {
            let mut read = base;
            let mut out = Vec::with_capacity(block.len());
            for &plain in block {
                out.push(self.encrypt_letter(plain, &read));
                read.advance(block_length);
            }
            output.push(out);
        }

        tracing::debug!(blocks = output.len(), "encryption complete");
        Ok(output)
    }

    /// Decrypts `blocks` back to front.
    ///
    /// # Parameters
    /// - `blocks`: Segmented ciphertext letter codes.
    /// - `total_length`: Number of letters in the whole text. Fixes the
    ///   closed-form rotor state the walk starts from.
    ///
    /// # Errors
    /// - [`StepperError::InvalidLetterCode`] if any code exceeds 25.
    /// - [`StepperError::LengthMismatch`] if `total_length` differs from the
    ///   letters held by `blocks`, or `blocks` is not a valid segmentation.
    pub fn decrypt(&self, blocks: &[Block], total_length: usize) -> Result<Vec<Block>> {
        self.check_blocks(blocks)?;
        let held = crate::segment::total_length(blocks);
        if held != total_length {
            return Err(StepperError::LengthMismatch {
                expected: total_length,
                actual: held,
            });
        }
        tracing::debug!(
            blocks = blocks.len(),
            letters = total_length,
            block_count = self.scheduler.rows(),
            "decrypting"
        );

        let block_length = self.scheduler.block_length();
        let mut output: Vec<Block> = blocks.to_vec();
        let mut read = self.scheduler.positions_at_length(total_length as u64);

        for (index, block) in output.iter_mut().enumerate().rev() {
            if index + 1 < blocks.len() {
                let base = self.scheduler.positions_at_block(index as u64);
                read = self.scheduler.read_positions(&base, block_length);
            }
            for letter in block.iter_mut().rev() {
                read.retreat(block_length);
                *letter = self.decrypt_letter(*letter, &read);
            }
        }

        tracing::debug!(blocks = output.len(), "decryption complete");
        Ok(output)
    }

    /// Adds the key letter of every row, top to bottom.
    fn encrypt_letter(&self, plain: u8, read: &Positions) -> u8 {
        (0..self.scheduler.rows()).fold(plain, |letter, k| {
            (letter + self.key.digit(k, read[k])) % ALPHABET_SIZE
        })
    }

    /// Subtracts the key letter of every row, bottom to top.
    fn decrypt_letter(&self, cipher: u8, read: &Positions) -> u8 {
        (0..self.scheduler.rows()).rev().fold(cipher, |letter, k| {
            (letter as i16 - self.key.digit(k, read[k]) as i16).rem_euclid(ALPHABET_SIZE as i16)
                as u8
        })
    }

    fn check_blocks(&self, blocks: &[Block]) -> Result<()> {
        check_shape(blocks, self.scheduler.block_length())?;
        for &code in blocks.iter().flatten() {
            check_code(code)?;
        }
        Ok(())
    }
}
