use std::path::PathBuf;
use std::sync::Arc;

use crate::error::MirrorError;
use crate::link::Translator;
use crate::remote::Remote;
use crate::state::{MirrorReport, RunState};
use crate::walker::Walker;

pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 8;

/// Mirrors a remote directory onto local disk.
///
/// ```no_run
/// # async fn example(remote: std::sync::Arc<dyn ghdir::Remote>) -> Result<(), ghdir::MirrorError> {
/// let report = ghdir::Mirror::new(remote)
///     .with_output_dir("downloads")
///     .run("https://github.com/tesseract-ocr/tesseract/tree/4.0/m4")
///     .await?;
/// println!("{} files", report.files);
/// # Ok(())
/// # }
/// ```
pub struct Mirror {
    remote: Arc<dyn Remote>,
    translator: Translator,
    output_dir: PathBuf,
    max_concurrent_downloads: usize,
}

impl Mirror {
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self {
            remote,
            translator: Translator::default(),
            output_dir: PathBuf::from("."),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Directory the local root is created in. Defaults to `.`.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Upper bound on downloads in flight. Values below one are treated as one.
    pub fn with_max_concurrent_downloads(mut self, max: usize) -> Self {
        self.max_concurrent_downloads = max.max(1);
        self
    }

    /// Mirror the directory behind a browse URL.
    ///
    /// A malformed URL fails before any I/O. A failed listing or directory
    /// stops further expansion; a failed download does not. Every dispatched
    /// download runs to completion and the first recorded failure, if any,
    /// is returned.
    pub async fn run(&self, url: &str) -> Result<MirrorReport, MirrorError> {
        let translated = self.translator.translate(url)?;
        tracing::info!(
            api_url = %translated.api_url,
            local_root = %translated.local_root,
            "mirroring"
        );
        self.run_listing(&translated.api_url, &translated.local_root)
            .await
    }

    /// Mirror the directory listed at `api_url` into `local_root`.
    pub async fn run_listing(
        &self,
        api_url: &str,
        local_root: &str,
    ) -> Result<MirrorReport, MirrorError> {
        let state = Arc::new(RunState::new());
        let mut walker = Walker::new(
            Arc::clone(&self.remote),
            Arc::clone(&state),
            self.output_dir.clone(),
            self.max_concurrent_downloads,
        );

        if walker.create_dir(local_root).await {
            walker.walk(api_url, local_root).await;
        }
        walker.finish().await;

        match state.take_error() {
            Some(error) => {
                let suppressed = state.suppressed();
                if suppressed > 0 {
                    tracing::warn!(suppressed, "further failures were not reported");
                }
                Err(error)
            }
            None => Ok(state.report()),
        }
    }
}
