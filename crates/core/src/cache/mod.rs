//! File-backed cache for link metadata, images and rendered previews.
//!
//! This module provides a persistent, content-addressed cache on the local
//! filesystem. It supports:
//!
//! - Content-addressed keys using SHA-256 over purpose, URL and size
//! - Atomic whole-file writes via temp file and rename
//! - Unbounded accumulation (no eviction)

pub mod hash;
pub mod store;

pub use crate::Error;

pub use hash::{CacheKey, Purpose, compute_cache_key};
pub use store::{CACHE_DIR_NAME, CacheStore};
