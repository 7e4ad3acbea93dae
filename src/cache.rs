//! Rendered-output cache for content responses.
//!
//! Rendering a page means a full directory walk, a Markdown pass, and a
//! template render. This module lets the request handler skip all of that
//! when a file's stat signature hasn't changed since its output was last
//! written.
//!
//! # Design
//!
//! The cache is keyed by a **fingerprint**: a SHA-256 over the source
//! file's modification time, size, and path. Same stat signature, same
//! fingerprint, cache hit. Any stat change produces a new fingerprint and
//! therefore a miss. Old entries are never deleted, so the cache grows
//! until someone removes the directory. That is a storage concern, not a
//! correctness one: a stale entry can never be served, because its key can
//! no longer be computed.
//!
//! The fingerprint doubles as the response `ETag`, so clients revalidate
//! against exactly the key the server caches under.
//!
//! ## Storage
//!
//! One file per entry: `<cache_dir>/<fingerprint>.cache`, raw rendered
//! HTML bytes. Writes go through a temp file in the same directory and an
//! atomic rename into place, so concurrent workers rendering the same miss
//! can both write without a reader ever observing a torn file. Last write
//! wins; output is deterministic per fingerprint, so the winner is
//! byte-identical to the loser.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::UNIX_EPOCH;

/// Extension of cache artifact files.
const CACHE_EXT: &str = "cache";

/// Compute the cache fingerprint for a content file.
///
/// Hashes `(mtime, size, path)` from a single `stat` call; the file
/// contents are never read. Touching the file, rewriting it, or moving it
/// all yield a new fingerprint.
pub fn fingerprint(path: &Path) -> io::Result<String> {
    let meta = std::fs::metadata(path)?;
    let mtime = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(mtime.as_secs().to_le_bytes());
    hasher.update(mtime.subsec_nanos().to_le_bytes());
    hasher.update(meta.len().to_le_bytes());
    hasher.update(path.to_string_lossy().as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Path of the cache artifact for a fingerprint.
pub fn artifact_path(cache_dir: &Path, fingerprint: &str) -> PathBuf {
    cache_dir.join(format!("{fingerprint}.{CACHE_EXT}"))
}

/// Look up a cached artifact. Returns the rendered bytes on a hit.
///
/// A missing file is a plain miss; an unreadable file (permissions,
/// truncation mid-rename can't happen, but disks do fail) is also treated
/// as a miss rather than an error; the handler just renders again.
pub fn lookup(cache_dir: &Path, fingerprint: &str) -> Option<Vec<u8>> {
    std::fs::read(artifact_path(cache_dir, fingerprint)).ok()
}

/// Persist rendered output under a fingerprint.
///
/// Creates the cache directory if absent. The bytes are written to a temp
/// file in the cache directory and renamed into place, so a concurrent
/// `lookup` sees either nothing or the complete artifact.
pub fn store(cache_dir: &Path, fingerprint: &str, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(cache_dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(cache_dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(artifact_path(cache_dir, fingerprint))
        .map_err(|e| e.error)?;
    Ok(())
}

/// Process-lifetime hit/miss counters, shared across request workers.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hits = self.hits();
        let misses = self.misses();
        write!(
            f,
            "{} cached, {} rendered ({} total)",
            hits,
            misses,
            hits + misses
        )
    }
}
