//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RINKU_*)
//! 2. TOML config file (if RINKU_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::CACHE_DIR_NAME;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RINKU_*)
/// 2. TOML config file (if RINKU_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cache directory override.
    ///
    /// Set via RINKU_CACHE_DIR environment variable. Defaults to
    /// `<platform cache dir>/link-previews`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via RINKU_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via RINKU_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Upper bound for each external call (page fetch, image download, render), in milliseconds.
    ///
    /// Set via RINKU_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether to silence stderr while the metadata provider runs.
    ///
    /// Set via RINKU_QUIET_PROVIDER environment variable.
    #[serde(default = "default_true")]
    pub quiet_provider: bool,

    /// Chrome/Chromium executable used for preview rendering; auto-detected when unset.
    ///
    /// Set via RINKU_CHROME_EXECUTABLE environment variable.
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Launch the rendering browser with `--no-sandbox` (root in containers).
    ///
    /// Set via RINKU_BROWSER_NO_SANDBOX environment variable.
    #[serde(default)]
    pub browser_no_sandbox: bool,
}

fn default_user_agent() -> String {
    concat!("rinku/", env!("CARGO_PKG_VERSION")).into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            quiet_provider: true,
            chrome_executable: None,
            browser_no_sandbox: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the cache directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when no override is set and the platform
    /// has no user cache directory (e.g. no home directory).
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.cache_dir().join(CACHE_DIR_NAME))
            .ok_or_else(|| ConfigError::Missing {
                field: "cache_dir".into(),
                hint: "no platform cache directory; set RINKU_CACHE_DIR".into(),
            })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RINKU_`
    /// 2. TOML file from `RINKU_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RINKU_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RINKU_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
