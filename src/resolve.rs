//! URL-to-file resolution.
//!
//! Maps a request path to a content file on disk. For a URL `/a/b` with the
//! stock `.md` extension, resolution tries, in order:
//!
//! 1. `content/a/b.md` (exact file)
//! 2. `content/a/b/index.md` (directory index fallback)
//!
//! The first existing regular file wins; otherwise the URL is unresolved
//! and the caller substitutes the configured not-found document.
//!
//! URLs are rejected outright (treated as unresolved) when any segment is
//! `..` or contains a NUL byte, so a crafted request can never escape the
//! content root.

use std::path::{Path, PathBuf};

/// Resolve a URL path to an existing content file.
///
/// `url` is the raw request path (leading slash expected but not required);
/// `ext` is the content extension including the dot.
pub fn resolve(content_dir: &Path, url: &str, ext: &str) -> Option<PathBuf> {
    let relative = sanitize(url)?;

    let base = if relative.is_empty() {
        content_dir.to_path_buf()
    } else {
        content_dir.join(relative)
    };

    // Exact file: <path>.md
    let mut exact = base.clone().into_os_string();
    exact.push(ext);
    let exact = PathBuf::from(exact);
    if exact.is_file() {
        return Some(exact);
    }

    // Directory index: <path>/index.md
    let index = base.join(format!("index{ext}"));
    if index.is_file() {
        return Some(index);
    }

    None
}

/// Strip the leading and trailing slashes and refuse traversal attempts.
///
/// Returns the relative path to join onto the content root, or `None` when
/// the URL must not be mapped to the filesystem at all.
fn sanitize(url: &str) -> Option<&str> {
    if url.contains('\0') {
        return None;
    }
    let relative = url.trim_start_matches('/').trim_end_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(relative)
}
