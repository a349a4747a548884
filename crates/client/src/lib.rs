//! Evently HTTP Client
//!
//! A native Rust client for moving event attachments to and from the Evently
//! backend in fixed-size blocks.
//!
//! # Quick Start
//!
//! ```no_run
//! use evently_client::{EventlyClient, Identifier, MemorySource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), evently_client::Error> {
//!     let client = EventlyClient::new("http://localhost:5000");
//!
//!     // Upload a file to event 7, one block at a time
//!     let source = MemorySource::new("agenda.txt", b"doors open at 19:00".to_vec())
//!         .with_content_type("text/plain");
//!     let meta = client.upload(&source, &Identifier::Int(7)).await?;
//!     println!("Stored as attachment {} in {} blocks", meta.id, meta.block_count());
//!
//!     // Download it again
//!     let file = client.download(&meta.id).await?;
//!     assert_eq!(&file.data[..], b"doors open at 19:00");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Transfer model
//!
//! The server decides the block size when an upload is initiated. The client
//! then walks the block id range in ascending order, one request at a time,
//! and stops at the first failure. Nothing is retried and nothing is rolled
//! back.
//!
//! # Configuration
//!
//! ```no_run
//! use evently_client::EventlyClientBuilder;
//! use std::time::Duration;
//!
//! let client = EventlyClientBuilder::new("http://localhost:5000")
//!     .timeout(Duration::from_secs(120))
//!     .build()
//!     .unwrap();
//! ```

mod attachments;
mod error;
pub mod source;

pub use attachments::{DownloadedBlock, DownloadedFile};
pub use error::{Cause, Error};
pub use source::{ByteSource, FileSource, MemorySource};

// Re-export core types so callers don't need a direct `evently_core` dependency.
pub use evently_core::{AttachmentMetadata, Identifier, LayoutError, NewAttachment};

use std::time::Duration;

use reqwest::Client;

/// HTTP client for the Evently attachment endpoints.
#[derive(Debug, Clone)]
pub struct EventlyClient {
    client: Client,
    base_url: String,
}

/// Builder for configuring an [`EventlyClient`].
#[derive(Debug)]
pub struct EventlyClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl EventlyClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            client: None,
        }
    }

    /// Set a per-request timeout.
    ///
    /// By default no timeout is imposed and the transport's defaults apply.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or cookie stores.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<EventlyClient, Error> {
        let client = match self.client {
            Some(c) => c,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| Error::Configuration(e.to_string()))?
            }
        };

        Ok(EventlyClient {
            client,
            base_url: self.base_url,
        })
    }
}

impl EventlyClient {
    /// Create a new client with default configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use evently_client::EventlyClient;
    ///
    /// let client = EventlyClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        EventlyClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> EventlyClientBuilder {
        EventlyClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
