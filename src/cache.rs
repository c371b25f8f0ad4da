//! Disk cache for resized renditions.
//!
//! Decoding and Lanczos resampling dominate the cost of a resize request.
//! This module lets the request path skip both when the same rendition of the
//! same source has been produced before.
//!
//! # Design
//!
//! ## Cache keys
//!
//! The key identifies the *state* of a source file, not its content:
//! SHA-256 over the concatenation of the resolved source path, the file's base
//! name, its byte size and its modification time (Unix seconds). Hashing
//! identity instead of content means the source is read at most once per
//! request. The price is that a `touch` without an edit also invalidates, and
//! an edit that preserves both size and mtime is not noticed.
//!
//! The key does not include the requested dimensions. Dimensions become the
//! file name inside the key directory, so one key hosts every rendition of
//! one source state:
//!
//! ```text
//! {cache_root}/{request_path}/{hex(key)}/{width}x{height}
//! cache/albums/dawn.jpg/5f1c…e9/400x0
//! cache/albums/dawn.jpg/5f1c…e9/120x90
//! ```
//!
//! ## Invalidation
//!
//! There is none, explicitly. Editing a source changes its size or mtime,
//! which changes the key, which sends every lookup to a fresh directory.
//! Old directories are left behind; nothing in the request path deletes or
//! evicts. [`CacheStats`] exists so operators can watch that growth.
//!
//! ## Atomic publish
//!
//! [`RenditionCache::store`] writes to a temporary file inside the target
//! directory and renames it onto the final path. The rename is the only
//! operation that creates the final path, so a concurrent
//! [`lookup`](RenditionCache::lookup) sees either nothing or a complete file.
//! Two requests racing on the same rendition both compute it and both
//! rename; the contents are identical, so the last rename winning is fine.

use crate::imaging::RenditionSize;
use crate::source::FileIdentity;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Prefix of in-flight temporary files. Never a valid `{w}x{h}` name.
const TEMP_PREFIX: &str = ".tmp-";

/// SHA-256 fingerprint of a source file's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Derive the key for a source file.
    ///
    /// `source_path` is the resolved path (images root + request path);
    /// `identity` is what [`SourceImage::identity`](crate::source::SourceImage::identity)
    /// returned for it.
    pub fn derive(source_path: &Path, identity: &FileIdentity) -> Self {
        let data = format!(
            "{}{}{}{}",
            source_path.display(),
            identity.file_name,
            identity.size,
            identity.modified
        );
        Self(Sha256::digest(data.as_bytes()).into())
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        format!("{:x}", self)
    }
}

impl fmt::LowerHex for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Renditions stored under a cache root directory.
#[derive(Debug, Clone)]
pub struct RenditionCache {
    root: PathBuf,
}

impl RenditionCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every rendition of one source state.
    pub fn key_dir(&self, request_path: &str, key: &CacheKey) -> PathBuf {
        self.root
            .join(request_path.trim_start_matches('/'))
            .join(key.to_hex())
    }

    /// Final path of one rendition.
    pub fn rendition_path(&self, request_path: &str, key: &CacheKey, size: RenditionSize) -> PathBuf {
        self.key_dir(request_path, key).join(size.to_string())
    }

    /// Return the stored rendition, if present.
    pub fn lookup(&self, request_path: &str, key: &CacheKey, size: RenditionSize) -> Option<PathBuf> {
        let path = self.rendition_path(request_path, key, size);
        path.is_file().then_some(path)
    }

    /// Publish an encoded rendition and return its final path.
    ///
    /// Creates missing directories, writes `bytes` to a temporary file in the
    /// key directory, syncs it, then renames it into place.
    pub fn store(
        &self,
        request_path: &str,
        key: &CacheKey,
        size: RenditionSize,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self.key_dir(request_path, key);
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&dir)?;
        write_fully(&mut tmp, bytes)?;

        let path = dir.join(size.to_string());
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }

    /// Walk the cache root and summarize its contents.
    ///
    /// A missing root is an empty cache. Temporary files are skipped.
    pub fn stats(&self) -> io::Result<CacheStats> {
        let mut stats = CacheStats::default();
        if !self.root.exists() {
            return Ok(stats);
        }

        let mut key_dirs = std::collections::HashSet::new();
        for entry in walkdir::WalkDir::new(&self.root) {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() || is_temp_file(entry.path()) {
                continue;
            }
            let Some(key_dir) = entry.path().parent() else {
                continue;
            };
            if key_dirs.insert(key_dir.to_path_buf()) {
                stats.source_states += 1;
            }
            stats.renditions += 1;
            stats.bytes += entry.metadata().map_err(io::Error::other)?.len();
        }

        // Each key dir's parent is a request-path dir (one per source image)
        let sources: std::collections::HashSet<_> =
            key_dirs.iter().filter_map(|dir| dir.parent()).collect();
        stats.sources = sources.len() as u64;
        Ok(stats)
    }
}

fn write_fully(tmp: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_PREFIX))
}

/// Summary of what a cache root holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct source images with at least one rendition.
    pub sources: u64,
    /// Distinct source states (cache keys). Exceeds `sources` once sources are edited.
    pub source_states: u64,
    pub renditions: u64,
    pub bytes: u64,
}

impl CacheStats {
    /// Source states beyond the one current state per source.
    pub fn stale_states(&self) -> u64 {
        self.source_states.saturating_sub(self.sources)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.renditions == 0 {
            return write!(f, "empty");
        }
        write!(
            f,
            "{} renditions of {} sources, {} bytes",
            self.renditions, self.sources, self.bytes
        )?;
        if self.stale_states() > 0 {
            write!(f, " ({} stale source states)", self.stale_states())?;
        }
        Ok(())
    }
}
