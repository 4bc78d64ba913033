//! RotorScheduler: rotation offsets of the key rows.
//!
//! Each key row behaves as a rotor of `block_length` letters. Between blocks
//! every rotor steps by its own increment (the gear ratios). After a full
//! period of `block_length` blocks the rotors are resynchronized from a
//! closed-form function of the absolute block position, which gives the
//! whole train a long combined cycle and lets decryption start directly at
//! the end of a text.
//!
//! Both ways of obtaining a block's base positions reduce to one pure
//! function, [`RotorScheduler::positions_at_block`]:
//!
//! ```text
//! positions_at_block(i) = closed_form(p·L + 1) + (i mod L) · increments   (mod L)
//!                         where p = i / L, L = block_length
//! ```
//!
//! The forward walk ([`BlockPositions`]) computes the same values
//! incrementally and resynchronizes at each period boundary.

use std::ops::Index;

use crate::config::StepperConfig;

/// One rotation offset per key row, each in `[0, block_length)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positions(Vec<usize>);

impl Positions {
    /// All rows at offset 0.
    pub fn zeros(rows: usize) -> Self {
        Positions(vec![0; rows])
    }

    /// Wraps raw offsets. Offsets are not range-checked.
    pub fn from_vec(offsets: Vec<usize>) -> Self {
        Positions(offsets)
    }

    /// Offsets, topmost row first.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves every row forward by one letter, wrapping at `block_length`.
    pub fn advance(&mut self, block_length: usize) {
        for pos in self.0.iter_mut() {
            *pos += 1;
            if *pos >= block_length {
                *pos = 0;
            }
        }
    }

    /// Moves every row back by one letter, wrapping below zero.
    pub fn retreat(&mut self, block_length: usize) {
        for pos in self.0.iter_mut() {
            *pos = if *pos == 0 { block_length - 1 } else { *pos - 1 };
        }
    }
}

impl Index<usize> for Positions {
    type Output = usize;

    fn index(&self, row: usize) -> &usize {
        &self.0[row]
    }
}

/// Computes base and read positions for a rotor geometry.
#[derive(Debug, Clone)]
pub struct RotorScheduler {
    block_length: u64,
    increments: Vec<u64>,
    modulus: u64,
}

impl RotorScheduler {
    /// Creates a scheduler for `config`.
    pub fn new(config: &StepperConfig) -> Self {
        let block_length = config.block_length() as u64;
        RotorScheduler {
            block_length,
            increments: config
                .row_increments()
                .iter()
                .map(|&inc| inc as u64 % block_length)
                .collect(),
            modulus: config.period_modulus(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.increments.len()
    }

    /// Width of each row.
    pub fn block_length(&self) -> usize {
        self.block_length as usize
    }

    /// Closed-form base positions at 1-based block-stream position `n`.
    ///
    /// `v = (n - 1) mod (L^rows · rows)` is written in base `L`: the least
    /// significant digit goes to the bottommost row, more significant digits
    /// to the rows above it. Extraction stops as soon as the remaining
    /// quotient reaches zero; rows not reached stay at zero. Positions
    /// `n < L` always yield all zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepper::config::StepperConfig;
    /// use stepper::rotor::RotorScheduler;
    ///
    /// let sched = RotorScheduler::new(&StepperConfig::new(3, vec![1, 1]).unwrap());
    /// assert_eq!(sched.closed_form(2).as_slice(), &[0, 0]);
    /// // v = 3 = 10 in base 3
    /// assert_eq!(sched.closed_form(4).as_slice(), &[1, 0]);
    /// ```
    pub fn closed_form(&self, n: u64) -> Positions {
        let rows = self.rows();
        let mut positions = Positions::zeros(rows);
        if n < self.block_length {
            return positions;
        }

        let mut quotient = (n - 1) % self.modulus;
        for row in (0..rows).rev() {
            positions.0[row] = (quotient % self.block_length) as usize;
            quotient /= self.block_length;
            if quotient == 0 {
                break;
            }
        }
        positions
    }

    /// Base positions of 0-based block `block_index`.
    ///
    /// The period start is taken from [`closed_form`](Self::closed_form);
    /// each row then advances by its increment once per block already
    /// processed within the period.
    pub fn positions_at_block(&self, block_index: u64) -> Positions {
        let offset = block_index % self.block_length;
        let period_start = block_index - offset;
        let mut positions = self.closed_form(period_start + 1);
        let l = self.block_length as u128;
        for (pos, &inc) in positions.0.iter_mut().zip(&self.increments) {
            let stepped = *pos as u128 + offset as u128 * inc as u128;
            *pos = (stepped % l) as usize;
        }
        positions
    }

    /// Steps every row by its increment, wrapping at `block_length`.
    pub fn step(&self, base: &Positions) -> Positions {
        let l = self.block_length as u128;
        Positions(
            base.0
                .iter()
                .zip(&self.increments)
                .map(|(&pos, &inc)| ((pos as u128 + inc as u128) % l) as usize)
                .collect(),
        )
    }

    /// Base positions of block `block_index + 1` given those of
    /// `block_index`.
    ///
    /// Within a period this is [`step`](Self::step); when the next block
    /// opens a new period the positions are recomputed in closed form.
    pub fn next_block(&self, block_index: u64, base: &Positions) -> Positions {
        let next = block_index + 1;
        if next % self.block_length == 0 {
            let resynced = self.closed_form(next + 1);
            tracing::trace!(
                block = next,
                positions = ?resynced.as_slice(),
                "period boundary, rotors resynchronized"
            );
            resynced
        } else {
            self.step(base)
        }
    }

    /// Read positions after `char_offset` characters of a block.
    ///
    /// All rows advance together, once per character consumed.
    pub fn read_positions(&self, base: &Positions, char_offset: usize) -> Positions {
        let l = self.block_length as u128;
        Positions(
            base.0
                .iter()
                .map(|&pos| ((pos as u128 + char_offset as u128) % l) as usize)
                .collect(),
        )
    }

    /// Read positions just past the last letter of a text of
    /// `total_length` letters.
    ///
    /// Computed directly from the final block's closed-form base, without
    /// replaying the blocks before it. A zero length yields the start
    /// positions of block 0.
    pub fn positions_at_length(&self, total_length: u64) -> Positions {
        if total_length == 0 {
            return self.positions_at_block(0);
        }
        let last_block = (total_length - 1) / self.block_length;
        let consumed = total_length - last_block * self.block_length;
        let base = self.positions_at_block(last_block);
        self.read_positions(&base, consumed as usize)
    }

    /// Forward iterator over base positions of blocks 0, 1, 2, …
    pub fn blocks_forward(&self) -> BlockPositions<'_> {
        BlockPositions {
            scheduler: self,
            index: 0,
            base: Positions::zeros(self.rows()),
        }
    }
}

/// Incremental forward walk of block base positions.
///
/// Yields `(block_index, base_positions)`. Produces exactly the values of
/// [`RotorScheduler::positions_at_block`].
pub struct BlockPositions<'a> {
    scheduler: &'a RotorScheduler,
    index: u64,
    base: Positions,
}

impl Iterator for BlockPositions<'_> {
    type Item = (u64, Positions);

    fn next(&mut self) -> Option<Self::Item> {
        let current = (self.index, self.base.clone());
        debug_assert_eq!(
            current.1,
            self.scheduler.positions_at_block(self.index),
            "incremental walk drifted at block {}",
            self.index
        );
        self.base = self.scheduler.next_block(self.index, &self.base);
        self.index += 1;
        Some(current)
    }
}
