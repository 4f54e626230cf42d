//! Request URL normalization and validation.

use std::fmt;

/// Error type for URL normalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// A validated absolute http(s) URL as requested by the caller.
///
/// Keeps the normalized input text alongside the parsed form. The text is what
/// cache keys are derived from and what is reported back when a page declares
/// no canonical URL, so `example.com` stays `https://example.com` rather than
/// picking up the trailing slash `url::Url` serializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    text: String,
    parsed: url::Url,
}

impl TargetUrl {
    /// Normalize and validate a URL string.
    ///
    /// Normalization steps:
    /// 1. Trim leading/trailing whitespace
    /// 2. Default scheme to https:// if missing
    /// 3. Require an http or https scheme and a host
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(UrlError::Empty);
        }

        let text = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

        let parsed = url::Url::parse(&text).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(UrlError::InvalidUrl("missing host".into()));
        }

        Ok(Self { text, parsed })
    }

    /// The normalized URL text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed URL.
    pub fn url(&self) -> &url::Url {
        &self.parsed
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
