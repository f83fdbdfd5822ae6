use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::{ChunkStream, Entry, FetchError, Remote};

const CHUNK_SIZE: usize = 4;

#[derive(Debug, Clone)]
enum Body {
    Complete(Vec<u8>),
    /// Sends the bytes, then fails.
    Broken(Vec<u8>, FetchError),
    Failed(FetchError),
}

/// In-memory remote for testing. Listings and bodies are keyed by URL.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    listings: HashMap<String, Result<Vec<Entry>, FetchError>>,
    bodies: HashMap<String, Body>,
    listed: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listing(&mut self, url: impl Into<String>, entries: Vec<Entry>) {
        self.listings.insert(url.into(), Ok(entries));
    }

    pub fn fail_listing(&mut self, url: impl Into<String>, error: FetchError) {
        self.listings.insert(url.into(), Err(error));
    }

    pub fn add_body(&mut self, url: impl Into<String>, body: Vec<u8>) {
        self.bodies.insert(url.into(), Body::Complete(body));
    }

    pub fn fail_body(&mut self, url: impl Into<String>, error: FetchError) {
        self.bodies.insert(url.into(), Body::Failed(error));
    }

    /// The body starts streaming `partial`, then breaks with `error`.
    pub fn break_body(&mut self, url: impl Into<String>, partial: Vec<u8>, error: FetchError) {
        self.bodies.insert(url.into(), Body::Broken(partial, error));
    }

    /// Listing URLs requested so far, in order.
    pub fn listed(&self) -> Vec<String> {
        self.listed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Download URLs opened so far, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn not_found() -> FetchError {
    FetchError::Status {
        status: 404,
        message: "Not Found".into(),
    }
}

#[async_trait::async_trait]
impl Remote for InMemoryRemote {
    async fn list(&self, listing_url: &str) -> Result<Vec<Entry>, FetchError> {
        self.listed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listing_url.to_owned());

        self.listings
            .get(listing_url)
            .cloned()
            .unwrap_or_else(|| Err(not_found()))
    }

    async fn open(&self, download_url: &str) -> Result<Box<dyn ChunkStream>, FetchError> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(download_url.to_owned());

        let (bytes, trailing_error) = match self.bodies.get(download_url).cloned() {
            Some(Body::Complete(bytes)) => (bytes, None),
            Some(Body::Broken(bytes, error)) => (bytes, Some(error)),
            Some(Body::Failed(error)) => return Err(error),
            None => return Err(not_found()),
        };

        Ok(Box::new(ChunkedBody {
            chunks: bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect(),
            trailing_error,
        }))
    }
}

struct ChunkedBody {
    chunks: VecDeque<Vec<u8>>,
    trailing_error: Option<FetchError>,
}

#[async_trait::async_trait]
impl ChunkStream for ChunkedBody {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        if let Some(chunk) = self.chunks.pop_front() {
            return Ok(Some(chunk));
        }

        match self.trailing_error.take() {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(mut body: Box<dyn ChunkStream>) -> Result<Vec<u8>, FetchError> {
        let mut out = Vec::new();
        while let Some(chunk) = body.next_chunk().await? {
            out.extend(chunk);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn list_returns_registered_entries() {
        let mut remote = InMemoryRemote::new();
        remote.add_listing("mem://root", vec![Entry::file("a", "a", 1, "mem://a")]);

        let entries = remote.list("mem://root").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(remote.listed(), vec!["mem://root".to_owned()]);
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let remote = InMemoryRemote::new();
        let result = remote.list("mem://missing").await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn body_is_streamed_in_chunks() {
        let mut remote = InMemoryRemote::new();
        remote.add_body("mem://a", b"0123456789".to_vec());

        let body = remote.open("mem://a").await.unwrap();
        assert_eq!(collect(body).await.unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn broken_body_fails_after_partial_content() {
        let mut remote = InMemoryRemote::new();
        remote.break_body("mem://a", b"01234".to_vec(), FetchError::Network("reset".into()));

        let body = remote.open("mem://a").await.unwrap();
        assert_eq!(
            collect(body).await,
            Err(FetchError::Network("reset".into()))
        );
    }
}
