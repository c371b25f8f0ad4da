//! Parameter types for image operations.
//!
//! These structs describe *what* to render, not *how*. They sit between the
//! request handling in [`service`](crate::service), which decides whether a
//! rendition is needed at all, and the [`backend`](super::backend), which does
//! the pixel work. Keeping them separate lets tests swap in a mock backend
//! without touching the orchestration logic.
//!
//! ## Types
//!
//! - [`Quality`] — JPEG encoding quality (1–100, default 75). Clamped on construction.
//! - [`RenditionSize`] — Requested width × height, where `0` means "derive this axis".
//! - [`RenderParams`] — Exact output dimensions plus quality, resolved against the source.

use std::fmt;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// A requested rendition size, straight from the query string.
///
/// Either axis may be `0`. Both being `0` is the sentinel for
/// "serve the original, unresized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenditionSize {
    pub width: u32,
    pub height: u32,
}

impl RenditionSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_original(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Renders as `{width}x{height}`, which is also the cache file name.
impl fmt::Display for RenditionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fully resolved parameters for a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
