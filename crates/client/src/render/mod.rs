//! Headless browser rendering of preview cards.
//!
//! This module provides a [`CardRenderer`] implementation using chromiumoxide
//! for headless Chrome/Chromium browser control. Each render launches a
//! browser sized to the requested card, loads the card markup and captures a
//! PNG screenshot.

pub mod card;

use std::path::PathBuf;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use futures_util::StreamExt;
use rinku_core::{AppConfig, CardRenderer, Error, LinkMetadata, PreviewSize};
use thiserror::Error;

pub use card::card_html;

/// Resolves once every `<img>` in the document has loaded or failed.
const WAIT_FOR_IMAGES: &str = r#"Promise.all(Array.from(document.images).map(img => img.complete
    ? true
    : new Promise(resolve => { img.onload = img.onerror = () => resolve(true); })))"#;

/// Errors that can occur during card rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to load the card markup.
    #[error("content load failed: {0}")]
    ContentLoad(String),

    /// Failed to capture the page.
    #[error("screenshot failed: {0}")]
    Screenshot(String),
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::RenderCapture(err.to_string())
    }
}

/// Options for launching the rendering browser.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Explicit Chrome/Chromium executable; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,

    /// Pass `--no-sandbox`, needed when running as root in containers.
    pub no_sandbox: bool,
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self { chrome_executable: config.chrome_executable.clone(), no_sandbox: config.browser_no_sandbox }
    }
}

/// Headless Chrome/Chromium card renderer using chromiumoxide.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCardRenderer {
    options: RenderOptions,
}

impl HeadlessCardRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn browser_config(&self, size: PreviewSize) -> Result<BrowserConfig, RenderError> {
        let (width, height) = size.pixels();
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport { width, height, device_scale_factor: Some(1.0), ..Default::default() })
            .arg("--hide-scrollbars");

        if let Some(path) = &self.options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if self.options.no_sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(RenderError::BrowserLaunch)
    }

    async fn capture(browser: &Browser, html: &str) -> Result<Vec<u8>, RenderError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::ContentLoad(e.to_string()))?;

        page.set_content(html)
            .await
            .map_err(|e| RenderError::ContentLoad(e.to_string()))?;

        if let Err(e) = page.evaluate(WAIT_FOR_IMAGES).await {
            tracing::debug!("waiting for card images failed: {e}");
        }

        let png = page
            .screenshot(ScreenshotParams::builder().format(CaptureScreenshotFormat::Png).build())
            .await
            .map_err(|e| RenderError::Screenshot(e.to_string()))?;

        page.close().await.ok();
        Ok(png)
    }
}

#[async_trait::async_trait]
impl CardRenderer for HeadlessCardRenderer {
    async fn render_card(&self, metadata: &LinkMetadata, size: PreviewSize) -> Result<Vec<u8>, Error> {
        let config = self.browser_config(size)?;
        let (mut browser, mut handler) =
            Browser::launch(config).await.map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        let result = Self::capture(&browser, &card_html(metadata, size)).await;

        browser.close().await.ok();
        browser.wait().await.ok();
        events.abort();

        Ok(result?)
    }
}
