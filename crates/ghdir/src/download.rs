use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{DownloadError, MirrorError};
use crate::remote::Remote;
use crate::state::RunState;

/// One file to fetch and save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub url: String,
    pub path: PathBuf,
    /// Size reported by the listing. `None` skips the length check.
    pub expected_size: Option<u64>,
}

/// Fetch `job.url` into `job.path`, recording any failure in `state`.
///
/// A failed download never leaves a partial file behind: whatever was
/// written is removed before the failure is recorded.
pub async fn download_file(remote: &dyn Remote, job: &DownloadJob, state: &RunState) {
    tracing::debug!(url = %job.url, path = %job.path.display(), "downloading");

    match fetch_to_path(remote, job).await {
        Ok(written) => {
            tracing::info!(path = %job.path.display(), bytes = written, "saved");
            state.file_written(written);
        }
        Err(source) => {
            discard_partial(&job.path).await;
            state.record(MirrorError::Download {
                url: job.url.clone(),
                path: job.path.clone(),
                source,
            });
        }
    }
}

async fn fetch_to_path(remote: &dyn Remote, job: &DownloadJob) -> Result<u64, DownloadError> {
    let mut body = remote.open(&job.url).await?;
    let mut file = tokio::fs::File::create(&job.path).await?;
    let mut written = 0u64;

    while let Some(chunk) = body.next_chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;

    match job.expected_size {
        Some(expected) if expected != written => Err(DownloadError::SizeMismatch {
            expected,
            actual: written,
        }),
        _ => Ok(written),
    }
}

async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove partial file"),
    }
}
