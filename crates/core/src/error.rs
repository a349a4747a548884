//! Block layout errors.

use thiserror::Error;

/// A block layout that violates the attachment invariants.
///
/// Blocks are contiguous, zero-indexed and fixed-size except the last one,
/// which holds between 1 and `block_size` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The block size is zero.
    #[error("block size must be greater than zero")]
    ZeroBlockSize,

    /// The file has no bytes to transfer.
    #[error("file is empty")]
    EmptyFile,

    /// `last_block_id` is smaller than `first_block_id`.
    #[error("block range is inverted: first {first} > last {last}")]
    InvertedRange {
        /// First block id.
        first: u64,
        /// Last block id.
        last: u64,
    },

    /// The id range does not hold exactly `ceil(file_size / block_size)` blocks.
    #[error("expected {expected} blocks, metadata describes {actual}")]
    BlockCountMismatch {
        /// Block count implied by the file and block sizes.
        expected: u64,
        /// Block count implied by the id range.
        actual: u64,
    },

    /// The server-reported size differs from the local source size.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Expected byte count.
        expected: u64,
        /// Reported byte count.
        actual: u64,
    },
}
