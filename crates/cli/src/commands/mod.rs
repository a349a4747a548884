pub mod delete;
pub mod download;
pub mod info;
pub mod list;
pub mod upload;

use evently_ops::evently_client::AttachmentMetadata;

/// One-line text rendering of attachment metadata.
pub fn describe(meta: &AttachmentMetadata) -> String {
    format!(
        "{id} | {name} | {file_type} | {size} bytes | {blocks} x {block_size} byte blocks",
        id = meta.id,
        name = meta.file_name,
        file_type = meta.file_type,
        size = meta.file_size,
        blocks = meta.block_count(),
        block_size = meta.block_size,
    )
}
