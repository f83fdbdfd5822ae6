use std::sync::Arc;

use crate::entry::Entry;

/// Errors that can occur when talking to the remote host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

/// A body being received chunk by chunk.
#[async_trait::async_trait]
pub trait ChunkStream: Send {
    /// Next chunk of the body, or `None` once it is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError>;
}

/// The remote host being mirrored.
///
/// Implementations own transport concerns (HTTP client, headers,
/// timeouts). The walker only sees listings and byte streams.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    /// Fetch one directory level.
    async fn list(&self, listing_url: &str) -> Result<Vec<Entry>, FetchError>;

    /// Start receiving the raw content behind a download URL.
    async fn open(&self, download_url: &str) -> Result<Box<dyn ChunkStream>, FetchError>;
}

#[async_trait::async_trait]
impl<T: Remote + ?Sized> Remote for Arc<T> {
    async fn list(&self, listing_url: &str) -> Result<Vec<Entry>, FetchError> {
        (**self).list(listing_url).await
    }

    async fn open(&self, download_url: &str) -> Result<Box<dyn ChunkStream>, FetchError> {
        (**self).open(download_url).await
    }
}
