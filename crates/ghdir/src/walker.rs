use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::download::{DownloadJob, download_file};
use crate::entry::{Entry, EntryKind};
use crate::error::MirrorError;
use crate::link::file_name_from_url;
use crate::path::resolve_local_path;
use crate::remote::Remote;
use crate::state::RunState;

/// Expands listings depth-first and spawns one task per file.
///
/// Every spawned download lands in the walker's `JoinSet`, so `finish`
/// waits for downloads dispatched at any depth.
///
/// A failed listing or directory halts further expansion. A failed
/// download does not: it is recorded by its task and the walk carries on,
/// so the set of entries visited never depends on download timing.
pub(crate) struct Walker {
    remote: Arc<dyn Remote>,
    state: Arc<RunState>,
    output_dir: PathBuf,
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
    halted: bool,
}

impl Walker {
    pub(crate) fn new(
        remote: Arc<dyn Remote>,
        state: Arc<RunState>,
        output_dir: PathBuf,
        max_concurrent_downloads: usize,
    ) -> Self {
        Self {
            remote,
            state,
            output_dir,
            permits: Arc::new(Semaphore::new(max_concurrent_downloads.max(1))),
            tasks: JoinSet::new(),
            halted: false,
        }
    }

    /// Create `local` under the output directory. Existing directories are
    /// fine. Returns `false` after recording a failure, which halts the walk.
    pub(crate) async fn create_dir(&mut self, local: &str) -> bool {
        let path = self.output_dir.join(local);

        match tokio::fs::create_dir_all(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "directory ready");
                self.state.directory_created();
                true
            }
            Err(source) => {
                self.state
                    .record(MirrorError::DirectoryCreate { path, source });
                self.halted = true;
                false
            }
        }
    }

    /// Mirror one directory level into `local_root`, which must already exist.
    pub(crate) fn walk<'a>(
        &'a mut self,
        listing_url: &'a str,
        local_root: &'a str,
    ) -> BoxFuture<'a, ()> {
        async move {
            if self.halted {
                return;
            }

            tracing::debug!(url = listing_url, local_root, "fetching listing");

            let entries = match self.remote.list(listing_url).await {
                Ok(entries) => entries,
                Err(source) => {
                    self.state.record(MirrorError::ListingFetch {
                        url: listing_url.to_owned(),
                        source,
                    });
                    self.halted = true;
                    return;
                }
            };

            for entry in &entries {
                if self.halted {
                    tracing::debug!(local_root, "walk halted, stopping expansion");
                    return;
                }

                match &entry.kind {
                    EntryKind::Directory => {
                        let Some(child_listing) = entry.listing_url.as_deref() else {
                            self.skip(entry, "directory without listing url");
                            continue;
                        };

                        let child_root =
                            resolve_local_path(&entry.repo_path, &entry.name, local_root);

                        if self.create_dir(&child_root).await {
                            self.walk(child_listing, &child_root).await;
                        }
                    }
                    EntryKind::File => self.dispatch(entry, local_root),
                    EntryKind::Other(kind) => {
                        tracing::debug!(path = %entry.repo_path, %kind, "skipping unsupported entry");
                        self.state.entry_skipped();
                    }
                }
            }
        }
        .boxed()
    }

    fn dispatch(&mut self, entry: &Entry, local_root: &str) {
        let Some(url) = entry.download_url.clone() else {
            self.skip(entry, "file without download url");
            return;
        };

        let name = if entry.name.is_empty() {
            match file_name_from_url(&url) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(path = %entry.repo_path, error = %e, "skipping file without name");
                    self.state.entry_skipped();
                    return;
                }
            }
        } else {
            entry.name.clone()
        };

        let local = resolve_local_path(&entry.repo_path, &name, local_root);
        let job = DownloadJob {
            url,
            path: self.output_dir.join(local),
            expected_size: Some(entry.size),
        };

        let remote = Arc::clone(&self.remote);
        let state = Arc::clone(&self.state);
        let permits = Arc::clone(&self.permits);

        self.tasks.spawn(async move {
            // The semaphore is never closed.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            download_file(remote.as_ref(), &job, &state).await;
        });
    }

    fn skip(&self, entry: &Entry, reason: &str) {
        tracing::warn!(path = %entry.repo_path, reason, "skipping entry");
        self.state.entry_skipped();
    }

    /// Wait for every dispatched download.
    pub(crate) async fn finish(mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                self.state.record(MirrorError::Task(e));
            }
        }
    }
}
