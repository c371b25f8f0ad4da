//! Request parsing: route matching and rendition dimensions.
//!
//! Both functions are pure. The router hands over the raw path and query
//! pairs; nothing here touches the file system.

use crate::imaging::RenditionSize;
use thiserror::Error;

/// A query parameter that is present but not an unsigned integer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid {name} value")]
pub struct InvalidParameter {
    /// Name of the offending parameter (`width` or `height`).
    pub name: &'static str,
}

/// Extract `width` and `height` from query pairs.
///
/// Absent parameters are `0`. When a parameter is repeated, the first
/// occurrence wins. `width` is checked first, so a request with both
/// parameters invalid reports `width`.
pub fn parse_dimensions(query: &[(String, String)]) -> Result<RenditionSize, InvalidParameter> {
    let width = query_dimension(query, "width")?;
    let height = query_dimension(query, "height")?;
    Ok(RenditionSize::new(width, height))
}

fn query_dimension(query: &[(String, String)], name: &'static str) -> Result<u32, InvalidParameter> {
    let Some((_, raw)) = query.iter().find(|(key, _)| key == name) else {
        return Ok(0);
    };
    // `u32::from_str` tolerates a leading '+'; only plain digits are accepted here
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidParameter { name });
    }
    raw.parse().map_err(|_| InvalidParameter { name })
}

/// Whether a request path matches the served-image route.
///
/// The accepted shape is `[A-Za-z0-9_\-/]+\.(ext)` where `ext` is one of
/// `extensions`, compared case-sensitively. Since a dot may only appear
/// before the extension, `..` segments can never reach the file system.
pub fn is_servable_path(path: &str, extensions: &[String]) -> bool {
    let Some((stem, ext)) = path.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty()
        && stem
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/'))
        && extensions.iter().any(|e| e == ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn jpeg_exts() -> Vec<String> {
        vec!["jpg".into(), "jpeg".into()]
    }

    // =========================================================================
    // parse_dimensions
    // =========================================================================

    #[test]
    fn absent_parameters_are_zero() {
        assert_eq!(parse_dimensions(&[]).unwrap(), RenditionSize::new(0, 0));
    }

    #[test]
    fn width_only() {
        let size = parse_dimensions(&query(&[("width", "400")])).unwrap();
        assert_eq!(size, RenditionSize::new(400, 0));
    }

    #[test]
    fn both_parameters() {
        let size = parse_dimensions(&query(&[("height", "30"), ("width", "40")])).unwrap();
        assert_eq!(size, RenditionSize::new(40, 30));
    }

    #[test]
    fn unrelated_parameters_ignored() {
        let size = parse_dimensions(&query(&[("format", "webp"), ("width", "10")])).unwrap();
        assert_eq!(size, RenditionSize::new(10, 0));
    }

    #[test]
    fn non_numeric_width_names_width() {
        let err = parse_dimensions(&query(&[("width", "abc"), ("height", "10")])).unwrap_err();
        assert_eq!(err.name, "width");
        assert_eq!(err.to_string(), "invalid width value");
    }

    #[test]
    fn non_numeric_height_names_height() {
        let err = parse_dimensions(&query(&[("width", "10"), ("height", "tall")])).unwrap_err();
        assert_eq!(err.name, "height");
        assert_eq!(err.to_string(), "invalid height value");
    }

    #[test]
    fn both_invalid_reports_width() {
        let err = parse_dimensions(&query(&[("height", "x"), ("width", "y")])).unwrap_err();
        assert_eq!(err.name, "width");
    }

    #[test]
    fn negative_rejected() {
        let err = parse_dimensions(&query(&[("width", "-1")])).unwrap_err();
        assert_eq!(err.name, "width");
    }

    #[test]
    fn plus_sign_rejected() {
        assert!(parse_dimensions(&query(&[("width", "+5")])).is_err());
    }

    #[test]
    fn empty_value_rejected() {
        assert!(parse_dimensions(&query(&[("height", "")])).is_err());
    }

    #[test]
    fn overflow_rejected() {
        let err = parse_dimensions(&query(&[("width", "99999999999")])).unwrap_err();
        assert_eq!(err.name, "width");
    }

    #[test]
    fn u32_max_accepted() {
        let size = parse_dimensions(&query(&[("width", "4294967295")])).unwrap();
        assert_eq!(size.width, u32::MAX);
    }

    #[test]
    fn first_occurrence_wins() {
        let size = parse_dimensions(&query(&[("width", "10"), ("width", "bogus")])).unwrap();
        assert_eq!(size.width, 10);
    }

    // =========================================================================
    // is_servable_path
    // =========================================================================

    #[test]
    fn simple_jpeg_paths_match() {
        assert!(is_servable_path("photo.jpg", &jpeg_exts()));
        assert!(is_servable_path("albums/2024/photo-1_b.jpeg", &jpeg_exts()));
    }

    #[test]
    fn other_extensions_do_not_match() {
        assert!(!is_servable_path("photo.png", &jpeg_exts()));
        assert!(!is_servable_path("photo", &jpeg_exts()));
    }

    #[test]
    fn extension_is_case_sensitive() {
        assert!(!is_servable_path("photo.JPG", &jpeg_exts()));
    }

    #[test]
    fn traversal_does_not_match() {
        assert!(!is_servable_path("../secret.jpg", &jpeg_exts()));
        assert!(!is_servable_path("a/../../b.jpg", &jpeg_exts()));
    }

    #[test]
    fn extra_dots_and_spaces_do_not_match() {
        assert!(!is_servable_path("photo.old.jpg", &jpeg_exts()));
        assert!(!is_servable_path("my photo.jpg", &jpeg_exts()));
    }

    #[test]
    fn bare_extension_does_not_match() {
        assert!(!is_servable_path(".jpg", &jpeg_exts()));
    }
}
