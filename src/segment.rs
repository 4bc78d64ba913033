//! Block segmentation of letter-code sequences.

use crate::error::{Result, StepperError};

/// Ordered run of letter codes processed together.
pub type Block = Vec<u8>;

/// Splits `codes` into consecutive blocks of `block_len` codes.
///
/// The remainder occupies the last block (1..=block_len codes). An empty
/// input yields no blocks at all, never a single empty block.
///
/// # Errors
/// Returns [`StepperError::InvalidConfig`] if `block_len` is zero.
///
/// # Examples
///
/// ```
/// use stepper::segment::segment;
///
/// let blocks = segment(&[0, 1, 2, 3, 4], 3).unwrap();
/// assert_eq!(blocks, vec![vec![0, 1, 2], vec![3, 4]]);
/// assert!(segment(&[], 3).unwrap().is_empty());
/// ```
pub fn segment(codes: &[u8], block_len: usize) -> Result<Vec<Block>> {
    if block_len == 0 {
        return Err(StepperError::InvalidConfig(
            "block length must be at least 1",
        ));
    }
    Ok(codes.chunks(block_len).map(<[u8]>::to_vec).collect())
}

/// Concatenates blocks left to right. Exact inverse of [`segment`].
pub fn flatten(blocks: &[Block]) -> Vec<u8> {
    blocks.iter().flatten().copied().collect()
}

/// Total number of codes held by `blocks`.
pub fn total_length(blocks: &[Block]) -> usize {
    blocks.iter().map(Vec::len).sum()
}

/// Checks that `blocks` has the shape [`segment`] produces: every block
/// full except a non-empty last one.
///
/// # Errors
/// Returns [`StepperError::LengthMismatch`] naming the offending block's
/// expected and actual lengths.
pub(crate) fn check_shape(blocks: &[Block], block_len: usize) -> Result<()> {
    let Some((last, full)) = blocks.split_last() else {
        return Ok(());
    };
    if let Some(bad) = full.iter().find(|b| b.len() != block_len) {
        return Err(StepperError::LengthMismatch {
            expected: block_len,
            actual: bad.len(),
        });
    }
    if last.is_empty() || last.len() > block_len {
        return Err(StepperError::LengthMismatch {
            expected: block_len,
            actual: last.len(),
        });
    }
    Ok(())
}
