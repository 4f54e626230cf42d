//! Client code for rinku.
//!
//! This crate provides the HTTP fetch pipeline, link preview metadata
//! extraction and the concrete capability implementations the CLI injects
//! into the core resolvers.

pub mod extract;
pub mod fetch;
pub mod provider;

#[cfg(feature = "render")]
pub mod render;

pub use extract::{PageMetadata, extract_metadata};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use provider::{HttpImageMaterializer, HttpMetadataProvider};

#[cfg(feature = "render")]
pub use render::{HeadlessCardRenderer, RenderError, RenderOptions};
