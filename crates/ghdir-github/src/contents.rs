use ghdir::{Entry, EntryKind, FetchError};
use serde::Deserialize;

/// One item of GitHub's Contents API response.
/// `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}`
#[derive(Debug, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: String,
    /// API URL of this entry; for directories it lists the children.
    pub url: Option<String>,
    pub download_url: Option<String>,
}

impl From<ContentEntry> for Entry {
    fn from(content: ContentEntry) -> Self {
        let kind = EntryKind::parse(&content.entry_type);
        let listing_url = match kind {
            EntryKind::Directory => content.url,
            _ => None,
        };
        let download_url = match kind {
            EntryKind::File => content.download_url,
            _ => None,
        };

        Entry {
            repo_path: content.path,
            name: content.name,
            size: content.size,
            kind,
            listing_url,
            download_url,
        }
    }
}

/// A directory yields an array; a path naming a single file yields an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<ContentEntry>),
    File(ContentEntry),
}

/// Decode a Contents API body into listing entries, preserving order.
pub fn parse_listing(body: &[u8]) -> Result<Vec<Entry>, FetchError> {
    let response: ContentsResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::Decode(format!("failed to parse contents JSON: {e}")))?;

    Ok(match response {
        ContentsResponse::Directory(items) => items.into_iter().map(Entry::from).collect(),
        ContentsResponse::File(item) => vec![Entry::from(item)],
    })
}

/// Error body GitHub sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}
