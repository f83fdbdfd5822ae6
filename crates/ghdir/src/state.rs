use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::MirrorError;

/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub files: u64,
    pub bytes: u64,
    pub directories: u64,
    pub skipped: u64,
}

/// State shared by the walk and every download task of one run.
///
/// Holds the first recorded failure. Later failures are counted but
/// dropped.
#[derive(Debug, Default)]
pub struct RunState {
    first_error: Mutex<Option<MirrorError>>,
    suppressed: AtomicU64,
    files: AtomicU64,
    bytes: AtomicU64,
    directories: AtomicU64,
    skipped: AtomicU64,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Returns `true` if it became the run's error.
    pub fn record(&self, error: MirrorError) -> bool {
        let mut slot = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.is_some() {
            drop(slot);
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(%error, "additional failure");
            return false;
        }

        tracing::error!(%error, "mirror failed");
        *slot = Some(error);
        true
    }

    pub fn has_failed(&self) -> bool {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of failures recorded after the first one.
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Remove the recorded failure, leaving the slot empty.
    pub fn take_error(&self) -> Option<MirrorError> {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) fn file_written(&self, bytes: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn directory_created(&self) {
        self.directories.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn entry_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MirrorReport {
        MirrorReport {
            files: self.files.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            directories: self.directories.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}
