//! Turning user supplied path tokens into absolute paths.
//!
//! Paths are handled as plain strings and are never normalized: embedded
//! `.` and `..` segments or repeated slashes are kept as typed. None of the
//! functions here touch the filesystem, so callers must stat the result
//! before trusting it.

/// Resolve a navigation token against the session's current directory.
///
/// - `..` strips the last segment, or yields `/` when no segment is left.
/// - A token starting with `/` is used verbatim.
/// - Anything else is appended to `current` with a `/` separator.
pub fn resolve(current: &str, token: &str) -> String {
    if token == ".." {
        parent(current)
    } else if token.starts_with('/') {
        token.to_string()
    } else {
        join(current, token)
    }
}

/// Append a bare entry name to a directory path.
///
/// Used by the file operations, which take names relative to the current
/// directory rather than navigation tokens.
pub fn join(dir: &str, name: &str) -> String {
    format!("{dir}/{name}")
}

fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(pos) if pos != 0 => path[..pos].to_string(),
        _ => "/".to_string(),
    }
}
