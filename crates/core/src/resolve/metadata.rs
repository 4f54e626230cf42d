//! Metadata resolution through the metadata cache.

use super::{ResolveOptions, bounded};
use crate::cache::{CacheStore, Purpose, compute_cache_key};
use crate::provider::MetadataProvider;
use crate::quiet::StderrGuard;
use crate::{Error, LinkMetadata, TargetUrl};

/// Resolve metadata for `url`, consulting the cache before the provider.
///
/// An undecodable cache entry counts as a miss. A failure to persist a fresh
/// result is logged and ignored; only provider failures are returned.
pub async fn resolve_metadata(
    store: &CacheStore, provider: &dyn MetadataProvider, url: &TargetUrl, options: &ResolveOptions,
) -> Result<LinkMetadata, Error> {
    let path = store.path_for(&compute_cache_key(Purpose::Metadata, url.as_str()));

    if options.cache_enabled
        && let Ok(bytes) = store.read(&path).await
    {
        match LinkMetadata::from_cache_bytes(&bytes) {
            Ok(metadata) => {
                tracing::debug!("metadata cache hit for {url}");
                return Ok(metadata);
            }
            Err(e) => tracing::debug!("discarding unreadable metadata entry for {url}: {e}"),
        }
    }

    let metadata = {
        let _quiet = StderrGuard::maybe(options.quiet_provider);
        bounded(options.timeout, "metadata fetch", provider.fetch(url)).await?
    };

    if options.cache_enabled {
        match metadata.to_cache_bytes() {
            Ok(bytes) => {
                if let Err(e) = store.write(&path, &bytes).await {
                    tracing::debug!("could not cache metadata for {url}: {e}");
                }
            }
            Err(e) => tracing::debug!("could not serialize metadata for {url}: {e}"),
        }
    }

    Ok(metadata)
}
