//! Pure Rust JPEG backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode | `image::load_from_memory_with_format` (JPEG only) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//!
//! Resampling and encoding are both deterministic for a given input, so
//! repeated renders of the same source produce identical bytes.

use super::backend::{BackendError, ImageBackend};
use super::params::RenderParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// File extensions the JPEG decoder accepts.
const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Returns the set of file extensions this backend can serve.
pub fn supported_extensions() -> &'static [&'static str] {
    JPEG_EXTENSIONS
}

/// MIME type of everything this backend produces.
pub const CONTENT_TYPE: &str = "image/jpeg";

/// JPEG decode → Lanczos3 resize → JPEG encode.
pub struct JpegBackend;

impl JpegBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for JpegBackend {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn resize(&self, image: &DynamicImage, params: &RenderParams) -> DynamicImage {
        image.resize_exact(params.width, params.height, FilterType::Lanczos3)
    }

    fn encode(&self, image: &DynamicImage, params: &RenderParams) -> Result<Vec<u8>, BackendError> {
        // The JPEG encoder takes L8 and Rgb8 only
        let converted;
        let pixels = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            other => {
                converted = DynamicImage::ImageRgb8(other.to_rgb8());
                &converted
            }
        };

        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, params.quality.value());
        pixels
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(buf)
    }
}
