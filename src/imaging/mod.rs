//! Image processing — pure Rust, JPEG in and JPEG out.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory_with_format` |
//! | **Bounds check** | [`fits_within`] (no upscaling) |
//! | **Resize** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Encode** | `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a render
//! - **Backend**: [`ImageBackend`] trait + [`JpegBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_target_dimensions, fits_within};
pub use params::{Quality, RenderParams, RenditionSize};
pub use rust_backend::{CONTENT_TYPE, JpegBackend, supported_extensions};
