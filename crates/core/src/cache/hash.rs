//! Content-addressed cache key generation.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::PreviewSize;

/// What a cache entry holds.
///
/// Each purpose hashes under its own prefix so the same URL never collides
/// across purposes, and render keys fold in the requested pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Purpose {
    /// Serialized [`LinkMetadata`](crate::LinkMetadata).
    Metadata,
    /// The page's representative image, re-encoded as PNG.
    Image,
    /// A rendered preview card at the given size.
    Render(PreviewSize),
}

impl Purpose {
    fn prefix(&self) -> &'static str {
        match self {
            Purpose::Metadata => "metadata-",
            Purpose::Image => "image-",
            Purpose::Render(_) => "render-",
        }
    }

    /// File extension of entries with this purpose.
    pub fn extension(&self) -> &'static str {
        match self {
            Purpose::Metadata => "json",
            Purpose::Image | Purpose::Render(_) => "png",
        }
    }
}

/// A derived cache key: hex SHA-256 digest plus file extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    extension: &'static str,
}

impl CacheKey {
    /// Hex-encoded SHA-256 digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// File name of the entry, `<digest>.<extension>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.digest, self.extension)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.digest, self.extension)
    }
}

/// Compute the cache key for a URL under the given purpose.
///
/// The hashed text is `<prefix><url>` with `-<width>x<height>` appended for
/// render keys.
pub fn compute_cache_key(purpose: Purpose, url: &str) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(purpose.prefix().as_bytes());
    hasher.update(url.as_bytes());
    if let Purpose::Render(size) = purpose {
        hasher.update(format!("-{}x{}", size.width, size.height).as_bytes());
    }
    CacheKey { digest: hex::encode(hasher.finalize()), extension: purpose.extension() }
}
