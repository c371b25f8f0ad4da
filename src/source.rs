//! Original image locator.
//!
//! Maps a request path onto the images root and reads the identity metadata
//! (name, size, modification time) the cache key is derived from.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be opened. Covers both absent and unreadable files.
    #[error("source not found: {path}")]
    NotFound { path: PathBuf, source: io::Error },
    /// The file opened but a later stat or read failed.
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Identity of a source file at the moment it was stat'ed.
///
/// Two identities compare equal only while size and modification time are
/// unchanged, which is what makes them usable as a cache key input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    /// Base name of the file.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, whole seconds since the Unix epoch.
    pub modified: i64,
}

/// Resolve a request path against the images root.
///
/// Plain concatenation: leading slashes are dropped so the request path
/// can never replace the root. Traversal is ruled out earlier by the route
/// pattern ([`is_servable_path`](crate::request::is_servable_path)).
pub fn resolve(images_root: &Path, request_path: &str) -> PathBuf {
    images_root.join(request_path.trim_start_matches('/'))
}

/// An opened source image.
#[derive(Debug)]
pub struct SourceImage {
    path: PathBuf,
    file: File,
}

impl SourceImage {
    /// Open `images_root/request_path`.
    ///
    /// Anything that is not a regular file (a directory named `x.jpg`, for
    /// instance) counts as not found.
    pub fn open(images_root: &Path, request_path: &str) -> Result<Self, SourceError> {
        let path = resolve(images_root, request_path);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) => return Err(SourceError::NotFound { path, source }),
        };
        match file.metadata() {
            Ok(metadata) if metadata.is_file() => Ok(Self { path, file }),
            Ok(_) => Err(SourceError::NotFound {
                path,
                source: io::Error::new(io::ErrorKind::NotFound, "not a regular file"),
            }),
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stat the opened file.
    pub fn identity(&self) -> Result<FileIdentity, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.path.clone(),
            source,
        };
        let metadata = self.file.metadata().map_err(io_err)?;
        let modified = metadata.modified().map_err(io_err)?;
        let modified = match modified.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        };
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(FileIdentity {
            file_name,
            size: metadata.len(),
            modified,
        })
    }

    /// Read the whole file.
    pub fn read_to_end(mut self) -> Result<Vec<u8>, SourceError> {
        let mut buf = Vec::new();
        self.file
            .read_to_end(&mut buf)
            .map_err(|source| SourceError::Io {
                path: self.path,
                source,
            })?;
        Ok(buf)
    }
}
