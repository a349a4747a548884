use bytes::Bytes;
use evently_core::{AttachmentMetadata, Identifier, LayoutError, NewAttachment};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::Cause;
use crate::source::ByteSource;
use crate::{Error, EventlyClient};

/// One block as received from the download endpoint.
#[derive(Debug, Clone)]
pub struct DownloadedBlock {
    /// Block id.
    pub block_id: u64,
    /// Byte count reported by the `content-length` header.
    pub content_length: u64,
    /// Block bytes.
    pub data: Bytes,
}

/// A fully reassembled attachment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedFile {
    /// Attachment id.
    pub id: Identifier,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub file_type: String,
    /// Total byte length.
    pub file_size: u64,
    /// File contents.
    #[serde(skip)]
    pub data: Bytes,
}

fn connection(e: &reqwest::Error) -> Cause {
    Cause::Connection(e.to_string())
}

fn invalid(e: impl std::fmt::Display) -> Cause {
    Cause::InvalidResponse(e.to_string())
}

/// Pair a block body with its `content-length` header.
///
/// The header must be present, numeric, and equal to the body length: it is
/// what advances the reassembly cursor.
fn checked_block(
    block_id: u64,
    content_length: Option<&HeaderValue>,
    data: Bytes,
) -> Result<DownloadedBlock, Error> {
    let failed = |cause: Cause| Error::BlockDownloadFailed { block_id, cause };

    let content_length = content_length
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| failed(invalid("missing or malformed content-length header")))?;

    if data.len() as u64 != content_length {
        return Err(failed(invalid(format!(
            "content-length {content_length} but body holds {} bytes",
            data.len()
        ))));
    }

    Ok(DownloadedBlock {
        block_id,
        content_length,
        data,
    })
}

impl EventlyClient {
    // =========================================================================
    // Endpoint operations
    // =========================================================================

    /// Initiate an upload via `POST /attachment`.
    ///
    /// The server answers `201 Created` with the block layout to follow.
    pub async fn create_attachment(
        &self,
        request: &NewAttachment,
    ) -> Result<AttachmentMetadata, Error> {
        let url = format!("{}/attachment", self.base_url);
        let failed = |cause: Cause| Error::InitiationFailed {
            name: request.name.clone(),
            cause,
        };

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status() != StatusCode::CREATED {
            return Err(failed(Cause::Status(response.status().as_u16())));
        }

        response
            .json::<AttachmentMetadata>()
            .await
            .map_err(|e| failed(invalid(e)))
    }

    /// Upload one block via `POST /attachment/upload?id=&blockId=`.
    pub async fn upload_block(
        &self,
        id: &Identifier,
        block_id: u64,
        data: Bytes,
    ) -> Result<(), Error> {
        let url = format!("{}/attachment/upload", self.base_url);
        let failed = |cause: Cause| Error::BlockUploadFailed { block_id, cause };

        let response = self
            .client
            .post(&url)
            .query(&[("id", id.to_string()), ("blockId", block_id.to_string())])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(failed(Cause::Status(response.status().as_u16())))
        }
    }

    /// Fetch attachment metadata via `GET /attachment/?id=`.
    pub async fn attachment(&self, id: &Identifier) -> Result<AttachmentMetadata, Error> {
        let url = format!("{}/attachment/", self.base_url);
        let failed = |cause: Cause| Error::AttachmentNotFound {
            id: id.to_string(),
            cause,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("id", id.to_string())])
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status() != StatusCode::OK {
            return Err(failed(Cause::Status(response.status().as_u16())));
        }

        response
            .json::<AttachmentMetadata>()
            .await
            .map_err(|e| failed(invalid(e)))
    }

    /// Download one block via `GET /attachment/download?id=&blockId=`.
    ///
    /// The `content-length` header must be present and must match the number
    /// of bytes in the body.
    pub async fn download_block(
        &self,
        id: &Identifier,
        block_id: u64,
    ) -> Result<DownloadedBlock, Error> {
        let url = format!("{}/attachment/download", self.base_url);
        let failed = |cause: Cause| Error::BlockDownloadFailed { block_id, cause };

        let response = self
            .client
            .get(&url)
            .query(&[("id", id.to_string()), ("blockId", block_id.to_string())])
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status() != StatusCode::OK {
            return Err(failed(Cause::Status(response.status().as_u16())));
        }

        let content_length = response.headers().get(CONTENT_LENGTH).cloned();
        let data = response.bytes().await.map_err(|e| failed(connection(&e)))?;
        checked_block(block_id, content_length.as_ref(), data)
    }

    /// List the attachments of an event via `GET /attachment/event?eventId=`.
    pub async fn list_attachments(
        &self,
        event_id: &Identifier,
    ) -> Result<Vec<AttachmentMetadata>, Error> {
        let url = format!("{}/attachment/event", self.base_url);
        let failed = |cause: Cause| Error::ListFailed {
            event_id: event_id.to_string(),
            cause,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("eventId", event_id.to_string())])
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status() != StatusCode::OK {
            return Err(failed(Cause::Status(response.status().as_u16())));
        }

        response
            .json::<Vec<AttachmentMetadata>>()
            .await
            .map_err(|e| failed(invalid(e)))
    }

    /// Delete an attachment via `DELETE /attachment?id=`.
    ///
    /// Only `204 No Content` counts as success.
    pub async fn delete_attachment(&self, id: &Identifier) -> Result<(), Error> {
        let url = format!("{}/attachment", self.base_url);
        let failed = |cause: Cause| Error::DeleteFailed {
            id: id.to_string(),
            cause,
        };

        let response = self
            .client
            .delete(&url)
            .query(&[("id", id.to_string())])
            .send()
            .await
            .map_err(|e| failed(connection(&e)))?;

        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(failed(Cause::Status(response.status().as_u16())))
        }
    }

    // =========================================================================
    // Chunked transfers
    // =========================================================================

    /// Upload a file in server-sized blocks.
    ///
    /// Initiates the upload, then sends blocks `firstBlockId..=lastBlockId` in
    /// ascending order, reading each one from `source` just before it is sent.
    /// The first failing block aborts the upload; blocks already sent stay on
    /// the server.
    ///
    /// Empty sources are rejected with [`Error::InitiationFailed`] before any
    /// request is made.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), evently_client::Error> {
    /// use evently_client::{EventlyClient, FileSource, Identifier};
    ///
    /// let client = EventlyClient::new("http://localhost:5000");
    /// let source = FileSource::open("flyer.pdf")
    ///     .await
    ///     .expect("readable file")
    ///     .with_content_type("application/pdf");
    ///
    /// let meta = client.upload(&source, &Identifier::Int(3)).await?;
    /// println!("uploaded {} as {}", meta.file_name, meta.id);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, source), fields(name = source.name(), size = source.size()))]
    pub async fn upload<S>(
        &self,
        source: &S,
        event_id: &Identifier,
    ) -> Result<AttachmentMetadata, Error>
    where
        S: ByteSource + ?Sized,
    {
        let name = source.name().to_owned();
        let size = source.size();
        let failed = |cause: Cause| Error::InitiationFailed {
            name: name.clone(),
            cause,
        };

        if size == 0 {
            return Err(failed(LayoutError::EmptyFile.into()));
        }

        let meta = self
            .create_attachment(&NewAttachment {
                name: name.clone(),
                event_id: event_id.clone(),
                file_size: size,
                file_type: source.content_type().to_owned(),
            })
            .await?;

        meta.validate().map_err(|e| failed(e.into()))?;
        if meta.file_size != size {
            return Err(failed(
                LayoutError::SizeMismatch {
                    expected: size,
                    actual: meta.file_size,
                }
                .into(),
            ));
        }

        debug!(
            attachment_id = %meta.id,
            block_size = meta.block_size,
            blocks = meta.block_count(),
            "upload initiated"
        );

        for block in meta.blocks() {
            let data = source
                .read_range(block.range())
                .await
                .map_err(|source| Error::Source {
                    name: name.clone(),
                    source,
                })?;

            debug!(block_id = block.id, len = block.len(), "uploading block");
            if let Err(e) = self.upload_block(&meta.id, block.id, data).await {
                warn!(block_id = block.id, error = %e, "block upload failed, aborting");
                return Err(e);
            }
        }

        info!(attachment_id = %meta.id, blocks = meta.block_count(), "upload complete");
        Ok(meta)
    }

    /// Upload several sources one at a time, in the order given.
    ///
    /// A failed file does not stop the batch: each source gets its own result.
    pub async fn upload_all<S>(
        &self,
        sources: &[S],
        event_id: &Identifier,
    ) -> Vec<Result<AttachmentMetadata, Error>>
    where
        S: ByteSource,
    {
        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            results.push(self.upload(source, event_id).await);
        }
        results
    }

    /// Download an attachment and reassemble it from its blocks.
    ///
    /// Blocks are fetched in ascending order and written at a cursor that
    /// advances by each block's `content-length`, so the short final block
    /// lands exactly at the end of the buffer. Any failure yields an error,
    /// never a truncated buffer.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), evently_client::Error> {
    /// use evently_client::{EventlyClient, Identifier};
    ///
    /// let client = EventlyClient::new("http://localhost:5000");
    /// let file = client.download(&Identifier::Int(17)).await?;
    /// println!("{} ({}, {} bytes)", file.file_name, file.file_type, file.file_size);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(attachment_id = %id))]
    pub async fn download(&self, id: &Identifier) -> Result<DownloadedFile, Error> {
        let meta = self.attachment(id).await?;
        let not_usable = |cause: Cause| Error::AttachmentNotFound {
            id: id.to_string(),
            cause,
        };
        meta.validate().map_err(|e| not_usable(e.into()))?;
        let file_size = usize::try_from(meta.file_size).map_err(|e| not_usable(invalid(e)))?;

        debug!(
            file_size = meta.file_size,
            blocks = meta.block_count(),
            "downloading attachment"
        );

        let mut buf = Vec::new();
        buf.try_reserve_exact(file_size).map_err(|e| {
            not_usable(invalid(format!(
                "cannot allocate {file_size}-byte buffer: {e}"
            )))
        })?;
        buf.resize(file_size, 0);
        let mut cursor = 0usize;

        for block in meta.blocks() {
            let chunk = match self.download_block(id, block.id).await {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(block_id = block.id, error = %e, "block download failed, aborting");
                    return Err(e);
                }
            };

            let end = usize::try_from(chunk.content_length)
                .ok()
                .and_then(|len| cursor.checked_add(len))
                .filter(|&end| end <= file_size)
                .ok_or_else(|| Error::BlockDownloadFailed {
                    block_id: block.id,
                    cause: invalid(format!(
                        "block of {} bytes at offset {cursor} overruns {file_size}-byte file",
                        chunk.content_length
                    )),
                })?;

            buf[cursor..end].copy_from_slice(&chunk.data);
            cursor = end;
        }

        if cursor != file_size {
            return Err(Error::BlockDownloadFailed {
                block_id: meta.last_block_id,
                cause: invalid(format!("received {cursor} of {file_size} bytes")),
            });
        }

        info!(file_size = meta.file_size, "download complete");
        Ok(DownloadedFile {
            id: meta.id,
            file_name: meta.file_name,
            file_type: meta.file_type,
            file_size: meta.file_size,
            data: Bytes::from(buf),
        })
    }
}
