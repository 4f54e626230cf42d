//! Core types and shared functionality for rinku.
//!
//! This crate provides:
//! - File-backed, content-addressed cache for metadata, images and previews
//! - Capability traits for metadata providers, image materializers and card renderers
//! - Cache-aware resolvers composing those capabilities
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod metadata;
pub mod png;
pub mod provider;
pub mod quiet;
pub mod resolve;
pub mod target;

pub use cache::{CacheKey, CacheStore, Purpose, compute_cache_key};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use metadata::{ImageHandle, LinkMetadata, PreviewSize};
pub use provider::{CardRenderer, ImageMaterializer, MetadataProvider};
pub use resolve::{ResolveOptions, render_preview, resolve_image, resolve_metadata};
pub use target::{TargetUrl, UrlError};
