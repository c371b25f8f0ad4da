//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the resize path
//! needs: decode, resize, and encode. Bounds checking is not a backend
//! concern; it lives in [`calculations`](super::calculations) and is applied
//! by the caller between decode and resize.
//!
//! The production implementation is
//! [`JpegBackend`](super::rust_backend::JpegBackend).

use super::params::RenderParams;
use image::DynamicImage;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations must be deterministic: the same input bytes and the same
/// [`RenderParams`] always produce byte-identical output. The disk cache
/// relies on this so that a cached rendition is indistinguishable from a
/// freshly computed one.
pub trait ImageBackend: Send + Sync {
    /// Decode raw file bytes into a pixel buffer.
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Scale to exactly `params.width` × `params.height`.
    fn resize(&self, image: &DynamicImage, params: &RenderParams) -> DynamicImage;

    /// Serialize back to the served raster format.
    fn encode(&self, image: &DynamicImage, params: &RenderParams) -> Result<Vec<u8>, BackendError>;
}
