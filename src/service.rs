//! Resize-and-cache request handling.
//!
//! [`RenditionService::render`] is the whole request lifecycle minus HTTP:
//!
//! ```text
//! size == 0x0 ──────────────────────────────► original bytes      (ORIGINAL)
//! open source ── cache? ── key ── lookup hit ► cached bytes        (HIT)
//!                  │               └─ miss ──► generate ─ store ─► (MISS)
//!                  └─ no cache ──────────────► generate ─────────► (BYPASS)
//!
//! generate = read ─ decode ─ bounds check ─ resize ─ encode
//! ```
//!
//! Everything here blocks. The server runs it on tokio's blocking pool, one
//! call per request, with no coordination between calls.

use crate::cache::{CacheKey, RenditionCache};
use crate::config::ServerConfig;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, JpegBackend, Quality, RenderParams, RenditionSize,
    calculate_target_dimensions, fits_within,
};
use crate::request::InvalidParameter;
use crate::source::{SourceError, SourceImage};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameter),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("requested {requested} exceeds original {original}")]
    DimensionTooLarge {
        requested: RenditionSize,
        original: Dimensions,
    },
    #[error("decoding {path} failed: {source}")]
    Decode { path: PathBuf, source: BackendError },
    #[error("encoding {path} at {size} failed: {source}")]
    Encode {
        path: PathBuf,
        size: RenditionSize,
        source: BackendError,
    },
    #[error("cache IO error on {path}: {source}")]
    Cache { path: PathBuf, source: io::Error },
}

/// Coarse classification of a [`ServeError`], one per response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    NotFound,
    DimensionTooLarge,
    Decode,
    Encode,
    Io,
}

impl ServeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::Source(SourceError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Source(SourceError::Io { .. }) | Self::Cache { .. } => ErrorKind::Io,
            Self::DimensionTooLarge { .. } => ErrorKind::DimensionTooLarge,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode { .. } => ErrorKind::Encode,
        }
    }

    /// Whether the caller is at fault. Server-side errors carry detail that
    /// must not be sent back.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidParameter | ErrorKind::NotFound | ErrorKind::DimensionTooLarge
        )
    }

    /// The message sent to the client.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidParameter => self.to_string(),
            ErrorKind::NotFound => "file not found".to_string(),
            ErrorKind::DimensionTooLarge => {
                "width and/or height value is greater than the original image dimensions"
                    .to_string()
            }
            ErrorKind::Decode | ErrorKind::Encode | ErrorKind::Io => {
                "internal server error".to_string()
            }
        }
    }
}

/// How a rendition was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No resize requested; the source file verbatim.
    Original,
    /// Served from the disk cache.
    Hit,
    /// Generated and stored in the disk cache.
    Miss,
    /// Generated inline; caching is disabled.
    Bypass,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Original => "ORIGINAL",
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Bypass => "BYPASS",
        };
        f.write_str(s)
    }
}

/// Encoded image bytes ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub body: Vec<u8>,
    pub cache: CacheStatus,
}

/// Serves originals and resized renditions of images under one root.
pub struct RenditionService<B = JpegBackend> {
    images_root: PathBuf,
    cache: Option<RenditionCache>,
    quality: Quality,
    backend: B,
}

impl RenditionService<JpegBackend> {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_backend(config, JpegBackend::new())
    }
}

impl<B: ImageBackend> RenditionService<B> {
    pub fn with_backend(config: &ServerConfig, backend: B) -> Self {
        Self {
            images_root: config.images_path.clone(),
            cache: config.cache_root().map(RenditionCache::new),
            quality: config.quality(),
            backend,
        }
    }

    pub fn cache(&self) -> Option<&RenditionCache> {
        self.cache.as_ref()
    }

    /// Produce the response body for `request_path` at `size`.
    pub fn render(&self, request_path: &str, size: RenditionSize) -> Result<Rendition, ServeError> {
        let source = SourceImage::open(&self.images_root, request_path)?;

        if size.is_original() {
            return Ok(Rendition {
                body: source.read_to_end()?,
                cache: CacheStatus::Original,
            });
        }

        let Some(cache) = &self.cache else {
            return Ok(Rendition {
                body: self.generate(source, size)?,
                cache: CacheStatus::Bypass,
            });
        };

        let identity = source.identity()?;
        let key = CacheKey::derive(source.path(), &identity);

        if let Some(hit) = cache.lookup(request_path, &key, size) {
            tracing::debug!(path = request_path, %size, "cache hit");
            let body = std::fs::read(&hit).map_err(|source| ServeError::Cache { path: hit, source })?;
            return Ok(Rendition {
                body,
                cache: CacheStatus::Hit,
            });
        }

        tracing::debug!(path = request_path, %size, key = %key.to_hex(), "cache miss");
        let encoded = self.generate(source, size)?;
        let stored = cache
            .store(request_path, &key, size, &encoded)
            .map_err(|source| ServeError::Cache {
                path: cache.rendition_path(request_path, &key, size),
                source,
            })?;
        let body = std::fs::read(&stored).map_err(|source| ServeError::Cache {
            path: stored.clone(),
            source,
        })?;
        Ok(Rendition {
            body,
            cache: CacheStatus::Miss,
        })
    }

    /// Read, decode, bounds-check, resize and encode.
    fn generate(&self, source: SourceImage, size: RenditionSize) -> Result<Vec<u8>, ServeError> {
        let path = source.path().to_path_buf();
        let data = source.read_to_end()?;

        let image = self
            .backend
            .decode(&data)
            .map_err(|source| ServeError::Decode {
                path: path.clone(),
                source,
            })?;

        let original = Dimensions::of(&image);
        if !fits_within(size.as_tuple(), original.as_tuple()) {
            return Err(ServeError::DimensionTooLarge {
                requested: size,
                original,
            });
        }

        let (width, height) = calculate_target_dimensions(size.as_tuple(), original.as_tuple());
        let params = RenderParams {
            width,
            height,
            quality: self.quality,
        };
        let resized = self.backend.resize(&image, &params);
        self.backend
            .encode(&resized, &params)
            .map_err(|source| ServeError::Encode { path, size, source })
    }
}
