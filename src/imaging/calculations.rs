//! Pure calculation functions for rendition dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Check a requested size against the original image.
///
/// Upscaling is rejected, never clamped: every nonzero requested axis must be
/// at most the matching original axis. A `0` axis is derived later and is
/// exempt from the comparison.
///
/// # Arguments
/// * `requested` - Requested (width, height), either may be `0`
/// * `original` - Decoded source (width, height)
pub fn fits_within(requested: (u32, u32), original: (u32, u32)) -> bool {
    let (req_w, req_h) = requested;
    let (orig_w, orig_h) = original;
    req_w <= orig_w && req_h <= orig_h
}

/// Resolve a requested size to exact output dimensions.
///
/// A `0` axis is derived from the other requested axis so the original
/// aspect ratio is preserved. The result never drops below 1 pixel.
///
/// # Examples
/// ```
/// # use imageserver::imaging::calculate_target_dimensions;
/// // 800x600 asked for width 400 → 400x300
/// assert_eq!(calculate_target_dimensions((400, 0), (800, 600)), (400, 300));
///
/// // Both axes given → used as-is, even if the aspect ratio changes
/// assert_eq!(calculate_target_dimensions((100, 100), (800, 600)), (100, 100));
/// ```
pub fn calculate_target_dimensions(requested: (u32, u32), original: (u32, u32)) -> (u32, u32) {
    let (req_w, req_h) = requested;
    let (orig_w, orig_h) = original;

    match (req_w, req_h) {
        (0, 0) => (orig_w, orig_h),
        (w, 0) => (w, scale_axis(w, orig_h, orig_w)),
        (0, h) => (scale_axis(h, orig_w, orig_h), h),
        (w, h) => (w, h),
    }
}

/// `given * numerator / denominator`, rounded, at least 1.
fn scale_axis(given: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return given.max(1);
    }
    let scaled = (given as f64 * numerator as f64 / denominator as f64).round();
    (scaled as u32).max(1)
}
