//! Error types for the operations layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the operations layer.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A local file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Error from the underlying HTTP client.
    #[error(transparent)]
    Client(#[from] evently_client::Error),
}
