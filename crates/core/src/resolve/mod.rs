//! Cache-aware resolution of metadata, images and rendered previews.
//!
//! ### Hit policy
//! - Metadata: serve a decodable cache entry, else fetch and best-effort persist.
//! - Image: serve the cached PNG path, else materialize, convert and write.
//!   Failures degrade to "no image".
//! - Render: a cached card short-circuits everything, including the metadata
//!   fetch. Otherwise metadata, render, write.
//!
//! ### Disabled cache
//! Nothing is read. Metadata is not written; image and render artifacts are
//! still written since the response has to name a file.

mod image;
mod metadata;
mod render;

use std::future::Future;
use std::time::Duration;

pub use self::image::resolve_image;
pub use metadata::resolve_metadata;
pub use render::render_preview;

use crate::{AppConfig, Error};

/// Per-invocation options threaded through every resolver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Whether to consult and populate the cache.
    pub cache_enabled: bool,
    /// Upper bound for each external call.
    pub timeout: Duration,
    /// Silence stderr while the metadata provider runs.
    pub quiet_provider: bool,
}

impl ResolveOptions {
    pub fn from_config(config: &AppConfig, cache_enabled: bool) -> Self {
        Self { cache_enabled, timeout: config.timeout(), quiet_provider: config.quiet_provider }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default(), true)
    }
}

/// Await `fut`, failing with [`Error::FetchTimeout`] after `timeout`.
async fn bounded<T>(timeout: Duration, what: &str, fut: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| Error::FetchTimeout(format!("{what} timed out after {}ms", timeout.as_millis())))?
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = AppConfig { timeout_ms: 1_500, quiet_provider: false, ..Default::default() };
        let options = ResolveOptions::from_config(&config, false);
        assert!(!options.cache_enabled);
        assert!(!options.quiet_provider);
        assert_eq!(options.timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn test_default_options_use_cache() {
        let options = ResolveOptions::default();
        assert!(options.cache_enabled);
        assert_eq!(options.timeout, Duration::from_millis(30_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: Result<(), Error> = bounded(Duration::from_millis(100), "page fetch", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(Error::FetchTimeout(msg)) if msg == "page fetch timed out after 100ms"));
    }

    #[tokio::test]
    async fn test_bounded_passes_through() {
        let result = bounded(Duration::from_secs(1), "page fetch", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
