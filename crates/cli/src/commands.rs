//! Dispatch of a validated invocation to the metadata or render path.

use rinku_client::{FetchClient, FetchConfig, HttpImageMaterializer, HttpMetadataProvider};
use rinku_core::{
    AppConfig, CacheStore, CardRenderer, Error, ImageMaterializer, MetadataProvider, ResolveOptions, render_preview,
    resolve_image, resolve_metadata,
};

use crate::args::Invocation;
use crate::output::Response;

/// The external capabilities an invocation may call.
pub struct Capabilities<'a> {
    pub provider: &'a dyn MetadataProvider,
    pub materializer: &'a dyn ImageMaterializer,
    /// `None` when preview rendering is not compiled in.
    pub renderer: Option<&'a dyn CardRenderer>,
}

/// Load configuration, wire up the HTTP and browser capabilities and run.
///
/// Every failure ends up as an error response.
pub async fn execute(invocation: Invocation) -> Response {
    match try_execute(&invocation).await {
        Ok(response) => response,
        Err(e) => failed(&e),
    }
}

async fn try_execute(invocation: &Invocation) -> Result<Response, Error> {
    let config = AppConfig::load().map_err(|e| Error::InvalidInput(e.to_string()))?;
    let cache_dir = config.resolve_cache_dir().map_err(|e| Error::InvalidInput(e.to_string()))?;
    let store = CacheStore::open(&cache_dir).await?;

    let client = FetchClient::new(FetchConfig::from(&config))?;
    let provider = HttpMetadataProvider::new(client.clone());
    let materializer = HttpImageMaterializer::new(client);

    #[cfg(feature = "render")]
    let renderer = rinku_client::HeadlessCardRenderer::new(rinku_client::RenderOptions::from(&config));

    let capabilities = Capabilities {
        provider: &provider,
        materializer: &materializer,
        #[cfg(feature = "render")]
        renderer: Some(&renderer),
        #[cfg(not(feature = "render"))]
        renderer: None,
    };

    let options = ResolveOptions::from_config(&config, invocation.cache_enabled);
    tracing::debug!(cache_dir = %store.dir().display(), ?options, "resolving {}", invocation.url);

    run(invocation, &store, &capabilities, &options).await
}

/// Resolve the invocation against `store` with the given capabilities.
///
/// Only mandatory steps fail: metadata resolution and, in render mode, the
/// render itself. A missing image is not an error.
pub async fn run(
    invocation: &Invocation, store: &CacheStore, capabilities: &Capabilities<'_>, options: &ResolveOptions,
) -> Result<Response, Error> {
    let url = &invocation.url;

    if let Some(size) = invocation.preview {
        let renderer = capabilities.renderer.ok_or(Error::RenderDisabled)?;
        let image = render_preview(store, capabilities.provider, renderer, url, size, options).await?;
        return Ok(Response::Preview { image });
    }

    let metadata = resolve_metadata(store, capabilities.provider, url, options).await?;
    let image = resolve_image(store, capabilities.materializer, &metadata, url, options).await;

    Ok(Response::metadata(metadata, image))
}

fn failed(err: &Error) -> Response {
    tracing::debug!(code = err.code(), "invocation failed: {err}");
    Response::error(err.message())
}
