//! Capabilities the resolvers depend on.
//!
//! These traits keep the cache and resolver logic independent of how metadata
//! is scraped, how images are downloaded and how preview cards are drawn.

use crate::{Error, ImageHandle, LinkMetadata, PreviewSize, TargetUrl};

/// Fetches link metadata for a page.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch title, canonical URL and image handle for `url`.
    async fn fetch(&self, url: &TargetUrl) -> Result<LinkMetadata, Error>;
}

/// Turns an image handle into raw image bytes.
#[async_trait::async_trait]
pub trait ImageMaterializer: Send + Sync {
    /// Materialize the image behind `handle`, in whatever format it is stored.
    async fn materialize(&self, handle: &ImageHandle) -> Result<Vec<u8>, Error>;
}

/// Draws a preview card for metadata.
///
/// Implementations are driven from a single rendering context: the resolvers
/// never call a renderer concurrently or from more than one task.
#[async_trait::async_trait]
pub trait CardRenderer: Send + Sync {
    /// Render `metadata` at `size` and return PNG bytes.
    async fn render_card(&self, metadata: &LinkMetadata, size: PreviewSize) -> Result<Vec<u8>, Error>;
}
