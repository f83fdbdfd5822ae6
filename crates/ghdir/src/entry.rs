use std::fmt;

/// Classification of a listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, submodules and anything else the listing reports.
    Other(String),
}

impl EntryKind {
    /// Parse the listing's type tag (`file`, `dir`, ...).
    pub fn parse(s: &str) -> Self {
        match s {
            "file" => Self::File,
            "dir" => Self::Directory,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "dir"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One item in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path relative to the repository root, e.g. `pkg/sub/file.go`.
    pub repo_path: String,
    /// Base name only.
    pub name: String,
    /// Size in bytes as reported by the listing. Zero for directories.
    pub size: u64,
    pub kind: EntryKind,
    /// API URL listing this directory's children. Set for directories.
    pub listing_url: Option<String>,
    /// Raw-content URL. Set for files.
    pub download_url: Option<String>,
}

impl Entry {
    pub fn file(
        repo_path: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            name: name.into(),
            size,
            kind: EntryKind::File,
            listing_url: None,
            download_url: Some(download_url.into()),
        }
    }

    pub fn directory(
        repo_path: impl Into<String>,
        name: impl Into<String>,
        listing_url: impl Into<String>,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            name: name.into(),
            size: 0,
            kind: EntryKind::Directory,
            listing_url: Some(listing_url.into()),
            download_url: None,
        }
    }
}
