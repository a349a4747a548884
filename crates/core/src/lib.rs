//! Core types shared by the Evently attachment client crates.
//!
//! Holds the server-issued [`AttachmentMetadata`] descriptor and the block
//! layout arithmetic that drives chunked transfers. Nothing in this crate
//! performs I/O.

pub mod attachment;
pub mod block;
pub mod error;
pub mod identifier;

pub use attachment::{AttachmentMetadata, NewAttachment};
pub use block::{Block, Blocks, block_count, block_range};
pub use error::LayoutError;
pub use identifier::Identifier;
