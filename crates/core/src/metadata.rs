//! Link metadata and preview size types.

use serde::{Deserialize, Serialize};

use crate::TargetUrl;

/// Default preview card width in pixels.
pub const DEFAULT_WIDTH: f64 = 300.0;

/// Default preview card height in pixels.
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// Opaque reference to a page's representative image.
///
/// Providers decide what the handle holds; the HTTP provider stores an
/// absolute image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Link preview metadata for a page.
///
/// Produced once per invocation, either from the metadata cache or from the
/// provider, and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub title: Option<String>,
    /// Canonical URL of the page, or the requested URL when the page declares none.
    pub url: String,
    pub image: Option<ImageHandle>,
}

impl LinkMetadata {
    /// Build metadata for `requested`, falling back to the requested URL text
    /// when no canonical URL is known.
    pub fn new(
        requested: &TargetUrl, title: Option<String>, canonical_url: Option<String>, image: Option<ImageHandle>,
    ) -> Self {
        let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let url = canonical_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| requested.as_str().to_string());

        Self { title, url, image }
    }

    /// Serialize for the metadata cache.
    pub fn to_cache_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize a metadata cache entry.
    pub fn from_cache_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Requested pixel size of a rendered preview card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

impl PreviewSize {
    /// Whole-pixel dimensions for the rendering surface, at least 1x1.
    pub fn pixels(&self) -> (u32, u32) {
        (self.width.round().max(1.0) as u32, self.height.round().max(1.0) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetUrl {
        TargetUrl::parse("example.com").unwrap()
    }

    #[test]
    fn test_canonical_url_falls_back_to_request() {
        let metadata = LinkMetadata::new(&target(), Some("Example Domain".into()), None, None);
        assert_eq!(metadata.url, "https://example.com");
        assert_eq!(metadata.title.as_deref(), Some("Example Domain"));
    }

    #[test]
    fn test_blank_fields_dropped() {
        let metadata = LinkMetadata::new(&target(), Some("   ".into()), Some("".into()), None);
        assert_eq!(metadata.title, None);
        assert_eq!(metadata.url, "https://example.com");
    }

    #[test]
    fn test_canonical_url_preferred() {
        let metadata = LinkMetadata::new(
            &target(),
            None,
            Some("https://www.example.com/".into()),
            Some(ImageHandle::new("https://example.com/og.png")),
        );
        assert_eq!(metadata.url, "https://www.example.com/");
        assert_eq!(metadata.image.as_ref().map(ImageHandle::as_str), Some("https://example.com/og.png"));
    }

    #[test]
    fn test_cache_bytes_shape() {
        let metadata = LinkMetadata::new(
            &target(),
            Some("Example".into()),
            None,
            Some(ImageHandle::new("https://example.com/og.png")),
        );
        let json: serde_json::Value = serde_json::from_slice(&metadata.to_cache_bytes().unwrap()).unwrap();
        assert_eq!(json["image"], "https://example.com/og.png");
        assert_eq!(LinkMetadata::from_cache_bytes(&metadata.to_cache_bytes().unwrap()).unwrap(), metadata);
    }

    #[test]
    fn test_from_cache_bytes_rejects_garbage() {
        assert!(LinkMetadata::from_cache_bytes(b"bplist00\x01").is_err());
    }

    #[test]
    fn test_preview_size_pixels() {
        assert_eq!(PreviewSize::default().pixels(), (300, 150));
        assert_eq!(PreviewSize { width: 640.4, height: 0.2 }.pixels(), (640, 1));
    }
}
