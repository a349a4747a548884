//! Common operations layer for the Evently CLI.
//!
//! Wraps [`evently_client::EventlyClient`] with configuration management and
//! the file-system side of transfers: opening local files for upload and
//! saving downloaded attachments under their original names.

mod config;
mod error;

pub use config::{DEFAULT_ENDPOINT, OpsConfig};
pub use error::OpsError;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use evently_client::{
    AttachmentMetadata, DownloadedFile, EventlyClient, EventlyClientBuilder, FileSource,
    Identifier,
};
use tracing::{info, warn};

/// Re-export the client crate for consumers.
pub use evently_client;

/// Outcome of uploading one local file.
#[derive(Debug)]
pub struct UploadReport {
    /// The local file.
    pub path: PathBuf,
    /// Server metadata on success.
    pub result: Result<AttachmentMetadata, OpsError>,
}

/// High-level operations client for Evently.
#[derive(Clone)]
pub struct OpsClient {
    inner: Arc<EventlyClient>,
}

impl OpsClient {
    /// Create a new operations client from configuration.
    pub fn from_config(config: &OpsConfig) -> Result<Self, OpsError> {
        let mut builder = EventlyClientBuilder::new(&config.endpoint);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| OpsError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Access the underlying HTTP client directly.
    pub fn client(&self) -> &EventlyClient {
        &self.inner
    }

    /// Upload local files to an event, one at a time, in the order given.
    ///
    /// A file that cannot be opened or uploaded is reported in its own
    /// [`UploadReport`] and the next file is still attempted.
    pub async fn upload_paths(
        &self,
        paths: &[PathBuf],
        event_id: &Identifier,
        content_type: Option<&str>,
    ) -> Vec<UploadReport> {
        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            let result = self.upload_path(path, event_id, content_type).await;
            if let Err(ref e) = result {
                warn!(path = %path.display(), error = %e, "upload failed");
            }
            reports.push(UploadReport {
                path: path.clone(),
                result,
            });
        }
        reports
    }

    async fn upload_path(
        &self,
        path: &Path,
        event_id: &Identifier,
        content_type: Option<&str>,
    ) -> Result<AttachmentMetadata, OpsError> {
        let mut source = FileSource::open(path)
            .await
            .map_err(|source| OpsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if let Some(content_type) = content_type {
            source = source.with_content_type(content_type);
        }
        Ok(self.inner.upload(&source, event_id).await?)
    }

    /// Download an attachment into `dir`, named after its server-side file name.
    ///
    /// Only the final component of the server-issued name is used, so the
    /// file always lands directly inside `dir`. Nothing is written unless the
    /// whole download succeeded.
    pub async fn download_to_dir(
        &self,
        id: &Identifier,
        dir: &Path,
    ) -> Result<(PathBuf, DownloadedFile), OpsError> {
        let file = self.inner.download(id).await?;
        let path = dir.join(local_file_name(&file.file_name, id));
        write_file(&path, &file).await?;
        Ok((path, file))
    }

    /// Download an attachment to an explicit path.
    pub async fn download_to_path(
        &self,
        id: &Identifier,
        path: &Path,
    ) -> Result<DownloadedFile, OpsError> {
        let file = self.inner.download(id).await?;
        write_file(path, &file).await?;
        Ok(file)
    }

    /// Fetch attachment metadata.
    pub async fn attachment_info(&self, id: &Identifier) -> Result<AttachmentMetadata, OpsError> {
        Ok(self.inner.attachment(id).await?)
    }

    /// List the attachments of an event.
    pub async fn list_attachments(
        &self,
        event_id: &Identifier,
    ) -> Result<Vec<AttachmentMetadata>, OpsError> {
        Ok(self.inner.list_attachments(event_id).await?)
    }

    /// Delete an attachment.
    pub async fn delete_attachment(&self, id: &Identifier) -> Result<(), OpsError> {
        self.inner.delete_attachment(id).await?;
        info!(attachment_id = %id, "attachment deleted");
        Ok(())
    }
}

async fn write_file(path: &Path, file: &DownloadedFile) -> Result<(), OpsError> {
    tokio::fs::write(path, &file.data)
        .await
        .map_err(|source| OpsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), bytes = file.file_size, "attachment saved");
    Ok(())
}

/// Final path component of a server-issued file name.
///
/// Falls back to `attachment-<id>` when the name has no usable component
/// (empty, `..`, or a bare root).
fn local_file_name(server_name: &str, id: &Identifier) -> String {
    let normalized = server_name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("attachment-{id}"))
}
