//! Representative image resolution. Never fails: problems are logged and the
//! image is reported as absent.

use std::path::{Path, PathBuf};

use super::{ResolveOptions, bounded};
use crate::cache::{CacheStore, Purpose, compute_cache_key};
use crate::png::normalize_png;
use crate::provider::ImageMaterializer;
use crate::{Error, ImageHandle, LinkMetadata, TargetUrl};

/// Resolve the cached PNG path of the page's representative image.
///
/// Returns `None` when the metadata has no image or when materializing,
/// converting or writing it fails.
pub async fn resolve_image(
    store: &CacheStore, materializer: &dyn ImageMaterializer, metadata: &LinkMetadata, url: &TargetUrl,
    options: &ResolveOptions,
) -> Option<PathBuf> {
    let handle = metadata.image.as_ref()?;
    let path = store.path_for(&compute_cache_key(Purpose::Image, url.as_str()));

    if options.cache_enabled && store.exists(&path).await {
        tracing::debug!("image cache hit for {url}");
        return Some(path);
    }

    match store_image(store, materializer, handle, &path, options).await {
        Ok(()) => Some(path),
        Err(e) => {
            tracing::warn!(url = %url, image = handle.as_str(), "image unavailable: {}", e.message());
            None
        }
    }
}

async fn store_image(
    store: &CacheStore, materializer: &dyn ImageMaterializer, handle: &ImageHandle, path: &Path,
    options: &ResolveOptions,
) -> Result<(), Error> {
    let raw = bounded(options.timeout, "image download", materializer.materialize(handle)).await?;
    let png = normalize_png(&raw).map_err(|e| Error::Image(format!("failed to convert image to PNG: {e}")))?;
    store.write(path, &png).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::tests::encoded;
    use crate::resolve::fakes::{FakeMaterializer, options, target};
    use image::ImageFormat;

    fn with_image() -> LinkMetadata {
        LinkMetadata::new(
            &target("example.com"),
            Some("Example".into()),
            None,
            Some(ImageHandle::new("https://example.com/og.jpg")),
        )
    }

    #[tokio::test]
    async fn test_no_handle_is_none_without_materializing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::open(tmp.path()).await.unwrap();
        let materializer = FakeMaterializer::ok(encoded(ImageFormat::Png));
        let metadata = LinkMetadata::new(&target("example.com"), None, None, None);

        let path = resolve_image(&store, &materializer, &metadata, &target("example.com"), &options(true)).await;

        assert!(path.is_none());
        assert_eq!(materializer.calls(), 0);
    }

    #[tokio::test]
    async fn test_materializes_converts_and_caches() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::open(tmp.path()).await.unwrap();
        let materializer = FakeMaterializer::ok(encoded(ImageFormat::Jpeg));
        let url = target("example.com");

        let path = resolve_image(&store, &materializer, &with_image(), &url, &options(true)).await.unwrap();

        assert!(path.starts_with(tmp.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_eq!(*materializer.handles.lock().unwrap(), vec!["https://example.com/og.jpg".to_string()]);

        let again = resolve_image(&store, &materializer, &with_image(), &url, &options(true)).await.unwrap();
        assert_eq!(again, path);
        assert_eq!(materializer.calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_rematerializes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::open(tmp.path()).await.unwrap();
        let materializer = FakeMaterializer::ok(encoded(ImageFormat::Png));
        let url = target("example.com");

        let first = resolve_image(&store, &materializer, &with_image(), &url, &options(false)).await;
        let second = resolve_image(&store, &materializer, &with_image(), &url, &options(false)).await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(materializer.calls(), 2);
    }

    #[tokio::test]
    async fn test_materialize_failure_is_soft() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::open(tmp.path()).await.unwrap();
        let materializer = FakeMaterializer::failing("status 404");
        let url = target("example.com");

        let path = resolve_image(&store, &materializer, &with_image(), &url, &options(true)).await;

        assert!(path.is_none());
        assert!(!store.path_for(&compute_cache_key(Purpose::Image, url.as_str())).exists());
    }

    #[tokio::test]
    async fn test_undecodable_image_is_soft() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CacheStore::open(tmp.path()).await.unwrap();
        let materializer = FakeMaterializer::ok(b"<html>404</html>".to_vec());
        let url = target("example.com");

        let path = resolve_image(&store, &materializer, &with_image(), &url, &options(true)).await;

        assert!(path.is_none());
        assert!(!store.path_for(&compute_cache_key(Purpose::Image, url.as_str())).exists());
    }

    #[tokio::test]
    async fn test_write_failure_is_soft() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("cache");
        let store = CacheStore::open(&dir).await.unwrap();
        std::fs::remove_dir(&dir).unwrap();
        let materializer = FakeMaterializer::ok(encoded(ImageFormat::Png));

        let path = resolve_image(&store, &materializer, &with_image(), &target("example.com"), &options(true)).await;
        assert!(path.is_none());
    }
}
