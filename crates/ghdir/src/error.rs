use std::path::PathBuf;

use crate::remote::FetchError;

/// The input is not a browse-directory URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid url {url:?}: {reason}")]
pub struct InvalidUrlError {
    pub url: String,
    pub reason: &'static str,
}

impl InvalidUrlError {
    pub(crate) fn new(url: &str, reason: &'static str) -> Self {
        Self {
            url: url.to_owned(),
            reason,
        }
    }
}

/// Why a single file could not be mirrored.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected {expected} bytes, received {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

/// Errors that end a mirror run.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrlError),

    #[error("failed to fetch listing {url}: {source}")]
    ListingFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {url} to {}: {source}", path.display())]
    Download {
        url: String,
        path: PathBuf,
        #[source]
        source: DownloadError,
    },

    #[error("download task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
