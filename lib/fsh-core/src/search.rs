//! Recursive, name based search.

use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use crate::path;

/// Collect every path below `root` whose name contains `pattern`.
///
/// The walk is depth first: a matching directory is reported before its
/// children, and its whole subtree is visited before its next sibling.
/// Siblings come in whatever order the OS enumerates them. Directories that
/// can't be read are skipped silently, and symlinks are never descended
/// into.
pub fn search(root: &str, pattern: &str) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|error| trace!(%root, %error, "skipping unreadable entry"))
                .ok()
        })
        .filter(|entry| entry.file_name().to_string_lossy().contains(pattern))
        .filter_map(|entry| display_path(root, entry.path()))
        .collect()
}

/// `found` as the shell prints it: `root` followed by the components below
/// it, each joined with a single `/`.
fn display_path(root: &str, found: &Path) -> Option<String> {
    let relative = found.strip_prefix(root).ok()?;
    Some(path::join(root, &relative.to_string_lossy()))
}
