use serde::{Deserialize, Serialize};

use crate::block::{Blocks, block_count};
use crate::error::LayoutError;
use crate::identifier::Identifier;

/// Server-issued descriptor of an attachment.
///
/// Returned when an upload is initiated and when an existing attachment is
/// queried. The client never mutates it; it only reads the block layout to
/// drive a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMetadata {
    /// Attachment id assigned by the server.
    pub id: Identifier,
    /// Original file name.
    pub file_name: String,
    /// Owning event.
    pub event_id: Identifier,
    /// Total byte length of the file.
    pub file_size: u64,
    /// MIME type.
    pub file_type: String,
    /// Byte length of every block except possibly the last.
    pub block_size: u64,
    /// First block id (inclusive).
    pub first_block_id: u64,
    /// Last block id (inclusive).
    pub last_block_id: u64,
}

impl AttachmentMetadata {
    /// Number of blocks described by the id range.
    pub fn block_count(&self) -> u64 {
        self.last_block_id
            .saturating_sub(self.first_block_id)
            .saturating_add(1)
    }

    /// Check that the descriptor obeys the block layout invariant.
    ///
    /// Blocks must be zero-indexed and contiguous, and the id range must
    /// hold exactly `ceil(file_size / block_size)` blocks, so the last block
    /// carries between 1 and `block_size` bytes.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let expected = block_count(self.file_size, self.block_size)?;
        if self.first_block_id > self.last_block_id {
            return Err(LayoutError::InvertedRange {
                first: self.first_block_id,
                last: self.last_block_id,
            });
        }
        let actual = self.block_count();
        if self.first_block_id != 0 || actual != expected {
            return Err(LayoutError::BlockCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Blocks from `first_block_id` to `last_block_id` in ascending order.
    ///
    /// Offsets come straight from the block id (`id * block_size`); call
    /// [`validate`](Self::validate) first when the descriptor is untrusted.
    pub fn blocks(&self) -> Blocks {
        Blocks::new(
            self.first_block_id..=self.last_block_id,
            self.block_size,
            self.file_size,
        )
    }
}

/// Request body that initiates an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    /// File name.
    pub name: String,
    /// Owning event.
    pub event_id: Identifier,
    /// Total byte length.
    pub file_size: u64,
    /// MIME type.
    pub file_type: String,
}
