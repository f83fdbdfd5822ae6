/// Join two `/`-separated path fragments. An empty base yields `name`.
pub fn join(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}

/// Compute the local path of a listing entry.
///
/// Listings report paths relative to the repository root, while the
/// mirror is rooted at `local_root`. The candidate `local_root/name` is
/// located inside `repo_path`; everything before its first occurrence is
/// replaced by the candidate and everything after is kept verbatim.
/// When the candidate does not occur, the candidate itself is returned.
///
/// `("tesseract/example/cli", "cli", "example")` resolves to `example/cli`.
pub fn resolve_local_path(repo_path: &str, name: &str, local_root: &str) -> String {
    let target = join(local_root, name);

    match repo_path.find(&target) {
        Some(idx) => format!("{target}{}", &repo_path[idx + target.len()..]),
        None => target,
    }
}
