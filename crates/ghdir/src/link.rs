use crate::error::InvalidUrlError;

pub const DEFAULT_BROWSE_BASE: &str = "https://github.com";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const TREE_MARKER: &str = "/tree/";
const CONTENTS: &str = "contents";

/// Result of translating a browse-directory URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    /// Contents API URL listing the directory, with the branch as `ref`.
    pub api_url: String,
    /// Name of the local directory the remote directory is mirrored into.
    pub local_root: String,
}

/// Converts browse URLs (`https://github.com/<owner>/<repo>/tree/<branch>/<dir>`)
/// into Contents API URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translator {
    browse_prefix: String,
    api_prefix: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_BROWSE_BASE, DEFAULT_API_BASE)
    }
}

impl Translator {
    /// `browse_base` is the web host (`https://github.com`), `api_base` the
    /// REST API root (`https://api.github.com`).
    pub fn new(browse_base: &str, api_base: &str) -> Self {
        Self {
            browse_prefix: format!("{}/", browse_base.trim_end_matches('/')),
            api_prefix: format!("{}/repos/", api_base.trim_end_matches('/')),
        }
    }

    /// A query string or fragment on the browse URL is ignored.
    pub fn translate(&self, url: &str) -> Result<Translated, InvalidUrlError> {
        let rest = strip_query(url)
            .strip_prefix(&self.browse_prefix)
            .ok_or_else(|| InvalidUrlError::new(url, "not a repository browse url"))?;

        let (repo, tail) = rest
            .split_once(TREE_MARKER)
            .ok_or_else(|| InvalidUrlError::new(url, "missing /tree/ segment"))?;

        let mut repo_parts = repo.split('/');
        match (repo_parts.next(), repo_parts.next(), repo_parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {}
            _ => return Err(InvalidUrlError::new(url, "expected <owner>/<repo> before /tree/")),
        }

        let (branch, dir) = tail
            .trim_end_matches('/')
            .split_once('/')
            .ok_or_else(|| InvalidUrlError::new(url, "missing directory after branch"))?;

        if branch.is_empty() {
            return Err(InvalidUrlError::new(url, "missing branch"));
        }

        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            return Err(InvalidUrlError::new(url, "missing directory after branch"));
        }

        Ok(Translated {
            api_url: format!(
                "{}{repo}/{CONTENTS}/{dir}?ref={branch}",
                self.api_prefix
            ),
            local_root: local_root_name(url),
        })
    }
}

/// Translate with the public GitHub hosts.
pub fn translate(url: &str) -> Result<Translated, InvalidUrlError> {
    Translator::default().translate(url)
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or_default()
}

/// Last path segment of the URL, percent-decoded when the escapes form
/// valid UTF-8.
pub fn local_root_name(url: &str) -> String {
    let segment = strip_query(url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_owned())
}

/// UTF-8 file name to save a download URL under.
///
/// Raw-content URLs escape non-ASCII names, so
/// `.../testdata/bar%C4%B1%C5%9F.png` yields `barış.png`.
pub fn file_name_from_url(url: &str) -> Result<String, InvalidUrlError> {
    let without_query = strip_query(url);

    let decoded = urlencoding::decode(without_query)
        .map_err(|_| InvalidUrlError::new(url, "escaped file name is not valid UTF-8"))?;

    match decoded.trim_end_matches('/').rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(InvalidUrlError::new(url, "no file name in url")),
    }
}
