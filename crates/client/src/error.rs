//! Error types for the Evently client.

use evently_core::LayoutError;
use thiserror::Error;

/// Why a single request step failed.
///
/// Transport failures and unexpected status codes are both causes of the
/// same step error, so callers handle them identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Cause {
    /// The server answered with a status code other than the expected one.
    #[error("HTTP {0}")]
    Status(u16),

    /// The request never completed (connection refused, DNS, timeout, ...).
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with the expected status but an unusable body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The block layout is unusable.
    #[error("invalid block layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Errors that can occur when using the Evently client.
///
/// Every multi-block operation stops at the first error; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The upload could not be initiated; no blocks were sent.
    #[error("failed to initiate upload of {name}: {cause}")]
    InitiationFailed {
        /// Name of the file being uploaded.
        name: String,
        /// Underlying cause.
        cause: Cause,
    },

    /// A block upload failed; later blocks were not attempted.
    #[error("failed to upload block {block_id}: {cause}")]
    BlockUploadFailed {
        /// Id of the failed block.
        block_id: u64,
        /// Underlying cause.
        cause: Cause,
    },

    /// A block download failed; later blocks were not requested.
    #[error("failed to download block {block_id}: {cause}")]
    BlockDownloadFailed {
        /// Id of the failed block.
        block_id: u64,
        /// Underlying cause.
        cause: Cause,
    },

    /// The attachment metadata could not be fetched.
    #[error("attachment {id} not found: {cause}")]
    AttachmentNotFound {
        /// Requested attachment id.
        id: String,
        /// Underlying cause.
        cause: Cause,
    },

    /// The attachment could not be deleted.
    #[error("failed to delete attachment {id}: {cause}")]
    DeleteFailed {
        /// Requested attachment id.
        id: String,
        /// Underlying cause.
        cause: Cause,
    },

    /// The attachments of an event could not be listed.
    #[error("failed to list attachments of event {event_id}: {cause}")]
    ListFailed {
        /// Requested event id.
        event_id: String,
        /// Underlying cause.
        cause: Cause,
    },

    /// The local byte source could not be read.
    #[error("failed to read {name}: {source}")]
    Source {
        /// Name of the source.
        name: String,
        /// I/O error from the source.
        #[source]
        source: std::io::Error,
    },

    /// Client configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// The underlying step cause, if this error came from a request step.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Self::InitiationFailed { cause, .. }
            | Self::BlockUploadFailed { cause, .. }
            | Self::BlockDownloadFailed { cause, .. }
            | Self::AttachmentNotFound { cause, .. }
            | Self::DeleteFailed { cause, .. }
            | Self::ListFailed { cause, .. } => Some(cause),
            Self::Source { .. } | Self::Configuration(_) => None,
        }
    }

    /// The block id at which a transfer stopped, if it failed mid-transfer.
    pub fn block_id(&self) -> Option<u64> {
        match self {
            Self::BlockUploadFailed { block_id, .. } | Self::BlockDownloadFailed { block_id, .. } => {
                Some(*block_id)
            }
            _ => None,
        }
    }

    /// The HTTP status code, if the failure was a non-matching status.
    pub fn status(&self) -> Option<u16> {
        match self.cause() {
            Some(Cause::Status(status)) => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the failure happened at the transport level.
    pub fn is_connection_error(&self) -> bool {
        matches!(self.cause(), Some(Cause::Connection(_)))
    }
}
