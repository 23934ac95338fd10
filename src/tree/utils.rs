//! Shared path and glob helpers for tree discovery

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

/// Leading character that marks an entry as hidden.
pub const HIDDEN_MARKER: char = '.';

/// `*` and `?` never cross a `/`, matching shell semantics.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Match a glob pattern against a name or slash-joined relative path.
#[cfg(test)]
fn glob_match(pattern: &str, candidate: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches_with(candidate, MATCH_OPTIONS))
        .unwrap_or(false)
}

/// Match a compiled pattern against a name or slash-joined relative path.
pub(crate) fn pattern_matches(pattern: &Pattern, candidate: &str) -> bool {
    pattern.matches_with(candidate, MATCH_OPTIONS)
}

/// Split a root-relative path into its segments.
///
/// `.` components are skipped. Absolute paths, `..`, and paths without any
/// segment are rejected.
pub fn path_segments(path: &Path) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidPath(path.to_path_buf()));
            }
        }
    }
    if segments.is_empty() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }
    Ok(segments)
}

pub fn is_hidden(segment: &str) -> bool {
    segment.starts_with(HIDDEN_MARKER)
}

/// Render a root-relative path for prompts and logs, using `.` for the root.
pub fn display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        path.to_string_lossy().into_owned()
    }
}

/// Join segments back into a relative path.
pub(crate) fn join_segments<S: AsRef<str>>(segments: &[S]) -> PathBuf {
    segments.iter().map(AsRef::as_ref).collect()
}
