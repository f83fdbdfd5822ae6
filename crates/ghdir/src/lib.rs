pub mod download;
pub mod entry;
pub mod error;
pub mod link;
pub mod mirror;
pub mod path;
pub mod remote;
pub mod state;
mod walker;

pub use download::{DownloadJob, download_file};
pub use entry::{Entry, EntryKind};
pub use error::{DownloadError, InvalidUrlError, MirrorError};
pub use link::{Translated, Translator, file_name_from_url, translate};
pub use mirror::{DEFAULT_MAX_CONCURRENT_DOWNLOADS, Mirror};
pub use path::resolve_local_path;
pub use remote::{ChunkStream, FetchError, Remote};
pub use state::{MirrorReport, RunState};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
