//! Readable byte sources for uploads.

use std::io::{self, SeekFrom};
use std::ops::Range;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;

/// Content type used when a source does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A named byte source with a known total length.
///
/// Uploads read one block at a time through [`read_range`](Self::read_range),
/// so implementations need not hold the whole file in memory.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// File name sent to the server.
    fn name(&self) -> &str;

    /// MIME type sent to the server.
    fn content_type(&self) -> &str;

    /// Total byte length.
    fn size(&self) -> u64;

    /// Read exactly the bytes in `range`.
    async fn read_range(&self, range: Range<u64>) -> io::Result<Bytes>;
}

/// A byte source backed by an in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    content_type: String,
    data: Bytes,
}

impl MemorySource {
    /// Create a source with the default content type.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            data: data.into(),
        }
    }

    /// Override the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        let start = usize::try_from(range.start).map_err(io::Error::other)?;
        let end = usize::try_from(range.end).map_err(io::Error::other)?;
        if start > end || end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("range {start}..{end} outside {} bytes", self.data.len()),
            ));
        }
        Ok(self.data.slice(start..end))
    }
}

/// A byte source backed by a file on disk.
///
/// The size is captured when the file is opened; each read seeks to the
/// block offset and reads only that block.
#[derive(Debug)]
pub struct FileSource {
    name: String,
    content_type: String,
    size: u64,
    file: Mutex<File>,
}

impl FileSource {
    /// Open `path`, naming the source after the file's final path component.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let size = file.metadata().await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;

        Ok(Self {
            name,
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            size,
            file: Mutex::new(file),
        })
    }

    /// Override the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

#[async_trait]
impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_range(&self, range: Range<u64>) -> io::Result<Bytes> {
        let len = usize::try_from(range.end.saturating_sub(range.start))
            .map_err(io::Error::other)?;
        let mut buf = vec![0u8; len];

        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(range.start)).await?;
        file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}
