//! Block layout arithmetic.
//!
//! A file of `S` bytes with block size `B` is split into `ceil(S / B)`
//! contiguous, zero-indexed blocks. Every block holds `B` bytes except the
//! last, which holds the remainder `S - B * (count - 1)`.

use std::ops::{Range, RangeInclusive};

use crate::error::LayoutError;

/// One block of a file: the half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Zero-based block id.
    pub id: u64,
    /// Offset of the first byte.
    pub start: u64,
    /// Offset one past the last byte.
    pub end: u64,
}

impl Block {
    /// Number of bytes in the block.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the block holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The block as a byte range.
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// Number of blocks needed to hold `file_size` bytes.
pub fn block_count(file_size: u64, block_size: u64) -> Result<u64, LayoutError> {
    if block_size == 0 {
        return Err(LayoutError::ZeroBlockSize);
    }
    if file_size == 0 {
        return Err(LayoutError::EmptyFile);
    }
    Ok(file_size.div_ceil(block_size))
}

/// Byte range of block `id`: `start = id * B`, `end = min((id + 1) * B, S)`.
///
/// Both offsets are clamped to `file_size`, so an id past the end of the
/// file yields an empty block rather than overflowing.
pub fn block_range(id: u64, block_size: u64, file_size: u64) -> Block {
    let start = id.saturating_mul(block_size).min(file_size);
    let end = id
        .saturating_add(1)
        .saturating_mul(block_size)
        .min(file_size);
    Block { id, start, end }
}

/// Iterator over the blocks of an attachment in ascending id order.
#[derive(Debug, Clone)]
pub struct Blocks {
    ids: RangeInclusive<u64>,
    block_size: u64,
    file_size: u64,
}

impl Blocks {
    pub(crate) fn new(ids: RangeInclusive<u64>, block_size: u64, file_size: u64) -> Self {
        Self {
            ids,
            block_size,
            file_size,
        }
    }
}

impl Iterator for Blocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        self.ids
            .next()
            .map(|id| block_range(id, self.block_size, self.file_size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}
