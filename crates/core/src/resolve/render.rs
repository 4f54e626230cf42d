//! Preview card rendering through the render cache.

use std::path::PathBuf;

use super::{ResolveOptions, bounded, resolve_metadata};
use crate::cache::{CacheStore, Purpose, compute_cache_key};
use crate::png::normalize_png;
use crate::provider::{CardRenderer, MetadataProvider};
use crate::{Error, PreviewSize, TargetUrl};

/// Render a preview card for `url` at `size` and return its cached PNG path.
///
/// A cached card for the same URL and size is returned without resolving
/// metadata at all.
pub async fn render_preview(
    store: &CacheStore, provider: &dyn MetadataProvider, renderer: &dyn CardRenderer, url: &TargetUrl,
    size: PreviewSize, options: &ResolveOptions,
) -> Result<PathBuf, Error> {
    let path = store.path_for(&compute_cache_key(Purpose::Render(size), url.as_str()));

    if options.cache_enabled && store.exists(&path).await {
        tracing::debug!("render cache hit for {url} at {}x{}", size.width, size.height);
        return Ok(path);
    }

    let metadata = resolve_metadata(store, provider, url, options).await?;

    let raw = bounded(options.timeout, "preview render", renderer.render_card(&metadata, size)).await?;
    if raw.is_empty() {
        return Err(Error::RenderCapture("renderer produced no drawable output".into()));
    }

    let png = normalize_png(&raw).map_err(|e| Error::RenderEncode(format!("failed to encode preview as PNG: {e}")))?;
    store.write(&path, &png).await?;

    Ok(path)
}
