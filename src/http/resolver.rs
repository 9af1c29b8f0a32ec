//! Maps a validated request target onto the document root.
//!
//! The traversal walk in [`collapse_segments`] is also what the validator
//! uses to detect targets escaping the root, so both sides always agree on
//! which `..` sequences are legal.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::http::outcome::Outcome;

/// Document served for the bare `/` target.
pub const DEFAULT_DOCUMENT: &str = "/index.html";

/// Walks the `/`-separated segments of `target` (skipping the leading one)
/// and collapses `..` against the segment before it.
///
/// Every non-`..` segment is pushed, empty ones included, so the stack
/// length is the running depth. Returns `None` as soon as a `..` would
/// pop an empty stack, i.e. the depth goes negative.
pub fn collapse_segments(target: &str) -> Option<Vec<&str>> {
    let mut stack = Vec::new();

    for segment in target.split('/').skip(1) {
        if segment == ".." {
            stack.pop()?;
        } else {
            stack.push(segment);
        }
    }

    Some(stack)
}

/// Returns `true` if walking `target` ever climbs above the root.
pub fn escapes_root(target: &str) -> bool {
    collapse_segments(target).is_none()
}

/// Computes the path of `target` relative to the document root, always
/// starting with `/`. `None` if the target escapes the root.
pub fn relative_path(target: &str) -> Option<String> {
    if target == "/" {
        return Some(DEFAULT_DOCUMENT.to_string());
    }

    if !target.contains("..") {
        return Some(target.to_string());
    }

    let stack = collapse_segments(target)?;
    Some(stack.iter().map(|segment| format!("/{}", segment)).collect())
}

/// Appends `relative` to `doc_root` byte for byte.
///
/// `Path::join` would replace the root when `relative` is absolute, which
/// is always the case here.
pub fn absolute_path(doc_root: &Path, relative: &str) -> PathBuf {
    let mut joined = OsString::from(doc_root.as_os_str());
    joined.push(relative);
    PathBuf::from(joined)
}

/// Resolves a validated target to an existing, non-directory file.
pub fn resolve(target: &str, doc_root: &Path) -> Outcome {
    let Some(relative) = relative_path(target) else {
        return Outcome::NotFound("escaping the doc root");
    };

    let path = absolute_path(doc_root, &relative);

    if path.exists() && !path.is_dir() {
        tracing::debug!(request_target = %target, path = %path.display(), "Resolved target");
        Outcome::Ok(path)
    } else {
        Outcome::NotFound("File not found")
    }
}
