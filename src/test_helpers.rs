//! Shared test utilities for the imageserver test suite.
//!
//! Generates synthetic JPEG sources on the fly so tests never depend on
//! fixture files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = images_root(&[("photo.jpg", 800, 600)]);
//! let config = test_config(tmp.path(), Some(&tmp.path().join("cache")));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

use crate::config::ServerConfig;

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a gradient JPEG of the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a synthetic JPEG to `path`, creating parent directories.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Create a temp images root populated with `(relative_path, width, height)` sources.
pub fn images_root(sources: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, w, h) in sources {
        write_test_jpeg(&tmp.path().join(rel), *w, *h);
    }
    tmp
}

// =========================================================================
// Config
// =========================================================================

/// Config rooted at `images`, with the disk cache at `cache` or disabled.
pub fn test_config(images: &Path, cache: Option<&Path>) -> ServerConfig {
    ServerConfig {
        images_path: images.to_path_buf(),
        cache_path: cache.map(Path::to_path_buf).unwrap_or_default(),
        cache: cache.is_some(),
        ..ServerConfig::default()
    }
}

/// Count regular files under `dir`, recursively. Missing dir counts as zero.
pub fn count_files(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}
