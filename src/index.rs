//! Page index: walks the content tree and builds a sorted list of
//! page summaries for listings and navigation.
//!
//! The index is rebuilt by a full directory walk on every request. That is
//! the system's main performance cost, but it keeps the server entirely
//! stateless: drop a file in the content directory and it is live on the
//! next request, no restart, no watcher.
//!
//! ## Exclusion rules
//!
//! A content file is skipped when:
//! - its basename starts with `~` or `#` (editor temp/backup files)
//! - it is the configured not-found document
//! - it is the configured site index document
//! - its path relative to the content root is listed in `ignore_files`
//!
//! ## URL derivation
//!
//! The URL is the path relative to the content root with the content
//! extension stripped and a trailing `index` segment collapsed:
//! `posts/hello.md` → `/posts/hello`, `docs/index.md` → `/docs`,
//! and the degenerate empty result becomes `/`.

use crate::config::SiteConfig;
use crate::content;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Summary of one content page, derived from its metadata block.
///
/// All metadata-sourced fields degrade to empty strings when absent.
/// `date` is an opaque string; sorting is lexicographic, which works for
/// the stock `%Y/%m/%d` format.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageSummary {
    /// Location of the source file on disk.
    pub path: PathBuf,
    pub title: String,
    pub url: String,
    pub author: String,
    pub date: String,
    pub description: String,
}

/// Field the page list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Date,
}

impl SortKey {
    /// Parse a sort field name. Anything other than `date` falls back to
    /// `title`, mirroring how themes request sorting by string.
    pub fn parse(name: &str) -> Self {
        match name {
            "date" => SortKey::Date,
            _ => SortKey::Title,
        }
    }
}

/// Walk the content tree and build the sorted page index.
///
/// Sorting compares the requested field first and breaks ties on title,
/// ascending unless `descending` is set.
pub fn build_index(
    config: &SiteConfig,
    sort_key: SortKey,
    descending: bool,
) -> Result<Vec<PageSummary>, IndexError> {
    let not_found = config.not_found_filename();
    let site_index = config.index_filename();

    let mut pages = Vec::new();
    for entry in WalkDir::new(&config.content_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(&config.content_ext) {
            continue;
        }
        if name.starts_with('~') || name.starts_with('#') {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&config.content_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        if relative == not_found || relative == site_index {
            continue;
        }
        if config.ignore_files.iter().any(|f| *f == relative) {
            continue;
        }

        let raw = fs::read_to_string(entry.path())?;
        let (meta_str, _body) = content::split_content(&raw);
        let meta = content::parse_meta(meta_str);
        let field = |key: &str| meta.get(key).cloned().unwrap_or_default();

        pages.push(PageSummary {
            path: entry.path().to_path_buf(),
            title: field("title"),
            url: derive_url(&relative, &config.content_ext),
            author: field("author"),
            date: field("date"),
            description: field("description"),
        });
    }

    pages.sort_by(|a, b| {
        let ordering = compare(a, b, sort_key);
        if descending { ordering.reverse() } else { ordering }
    });
    Ok(pages)
}

fn compare(a: &PageSummary, b: &PageSummary, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::Date => a.date.cmp(&b.date),
    };
    primary.then_with(|| a.title.cmp(&b.title))
}

/// Derive a page URL from its path relative to the content root.
fn derive_url(relative: &str, ext: &str) -> String {
    let mut url = format!("/{relative}");
    if let Some(stripped) = url.strip_suffix(ext) {
        url = stripped.to_string();
    }
    if let Some(stripped) = url.strip_suffix("/index") {
        url = stripped.to_string();
    }
    if url.is_empty() {
        url.push('/');
    }
    url
}
