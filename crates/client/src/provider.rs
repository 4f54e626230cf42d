//! HTTP-backed metadata provider and image materializer.

use rinku_core::{Error, ImageHandle, ImageMaterializer, LinkMetadata, MetadataProvider, TargetUrl};
use url::Url;

use crate::extract::extract_metadata;
use crate::fetch::{ACCEPT_HTML, ACCEPT_IMAGE, FetchClient};

/// Fetches a page and reads its OpenGraph / Twitter card / HTML metadata.
pub struct HttpMetadataProvider {
    client: FetchClient,
}

impl HttpMetadataProvider {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for HttpMetadataProvider {
    async fn fetch(&self, url: &TargetUrl) -> Result<LinkMetadata, Error> {
        let response = self.client.fetch(url.url(), ACCEPT_HTML).await?;

        if response.is_image() {
            let handle = ImageHandle::new(response.final_url.as_str());
            return Ok(LinkMetadata::new(url, None, None, Some(handle)));
        }

        if !response.is_html() {
            return Err(Error::Provider(format!(
                "unsupported content type: {}",
                response.content_type.as_deref().unwrap_or_default()
            )));
        }

        let html = String::from_utf8_lossy(&response.bytes);
        let page = extract_metadata(&html, &response.final_url);

        tracing::debug!(
            title = page.title.as_deref(),
            canonical = page.canonical_url.as_deref(),
            image = page.image_url.as_deref(),
            "extracted metadata for {url}"
        );

        Ok(LinkMetadata::new(url, page.title, page.canonical_url, page.image_url.map(ImageHandle::new)))
    }
}

/// Downloads images whose handle is an absolute http(s) URL.
pub struct HttpImageMaterializer {
    client: FetchClient,
}

impl HttpImageMaterializer {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageMaterializer for HttpImageMaterializer {
    async fn materialize(&self, handle: &ImageHandle) -> Result<Vec<u8>, Error> {
        let url = Url::parse(handle.as_str())
            .map_err(|e| Error::Image(format!("invalid image URL {}: {e}", handle.as_str())))?;

        let response = self.client.fetch(&url, ACCEPT_IMAGE).await?;
        if response.bytes.is_empty() {
            return Err(Error::Image(format!("{url} returned an empty body")));
        }

        Ok(response.bytes.to_vec())
    }
}
