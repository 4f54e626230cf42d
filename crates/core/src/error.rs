//! Unified error types for rinku.
//!
//! `Display` carries a stable code prefix for logs; [`Error::message`] is the
//! text that reaches the caller in the `{"error": ...}` response.

use std::path::PathBuf;

/// Unified error type shared by the cache, the resolvers and the clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The cache directory could not be created.
    #[error("CACHE_ERROR: failed to create {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No cache entry exists at the given path.
    #[error("CACHE_MISS: {}", .0.display())]
    CacheMiss(PathBuf),

    /// Writing a cache entry failed.
    #[error("CACHE_ERROR: failed to write {}: {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata provider could not produce metadata for the page.
    #[error("PROVIDER_ERROR: {0}")]
    Provider(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// An external call did not complete in time.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Image bytes could not be decoded or re-encoded.
    #[error("IMAGE_ERROR: {0}")]
    Image(String),

    /// The renderer produced no drawable output.
    #[error("RENDER_FAILED: {0}")]
    RenderCapture(String),

    /// The rendered output could not be encoded as PNG.
    #[error("RENDER_ENCODE_FAILED: {0}")]
    RenderEncode(String),

    /// Render mode is not compiled in.
    #[error("RENDER_DISABLED")]
    RenderDisabled,
}

impl Error {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::DirectoryCreation { .. } | Error::CacheWrite { .. } => "CACHE_ERROR",
            Error::CacheMiss(_) => "CACHE_MISS",
            Error::Provider(_) => "PROVIDER_ERROR",
            Error::HttpError(_) => "HTTP_ERROR",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::FetchTimeout(_) => "FETCH_TIMEOUT",
            Error::Image(_) => "IMAGE_ERROR",
            Error::RenderCapture(_) => "RENDER_FAILED",
            Error::RenderEncode(_) => "RENDER_ENCODE_FAILED",
            Error::RenderDisabled => "RENDER_DISABLED",
        }
    }

    /// Human-readable message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Error::InvalidInput(msg)
            | Error::Provider(msg)
            | Error::HttpError(msg)
            | Error::FetchTooLarge(msg)
            | Error::FetchTimeout(msg)
            | Error::Image(msg)
            | Error::RenderCapture(msg)
            | Error::RenderEncode(msg) => msg.clone(),
            Error::DirectoryCreation { path, source } => {
                format!("Failed to create cache directory {}: {source}", path.display())
            }
            Error::CacheWrite { path, source } => format!("Failed to write {}: {source}", path.display()),
            Error::CacheMiss(path) => format!("No cache entry at {}", path.display()),
            Error::RenderDisabled => "Preview rendering is not available in this build".to_string(),
        }
    }
}
