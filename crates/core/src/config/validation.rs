//! Bounds checks applied to a loaded [`AppConfig`].

use std::ops::RangeInclusive;

use crate::config::AppConfig;
use thiserror::Error;

/// Accepted response body cap, in bytes (up to 50MB).
pub const MAX_BYTES_RANGE: RangeInclusive<usize> = 1..=50 * 1024 * 1024;

/// Accepted per-call timeout, in milliseconds (100ms to 5 minutes).
pub const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 100..=300_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Reject values the fetch client, the resolvers or the cache cannot work with.
    ///
    /// The first failing field is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !MAX_BYTES_RANGE.contains(&self.max_bytes) {
            return Err(invalid("max_bytes", format!("must be between 1 and {} bytes", MAX_BYTES_RANGE.end())));
        }

        if !TIMEOUT_MS_RANGE.contains(&self.timeout_ms) {
            return Err(invalid(
                "timeout_ms",
                format!("must be between {}ms and {}ms", TIMEOUT_MS_RANGE.start(), TIMEOUT_MS_RANGE.end()),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be blank"));
        }

        if let Some(dir) = &self.cache_dir
            && dir.as_os_str().is_empty()
        {
            return Err(invalid("cache_dir", "must not be empty when set"));
        }

        if let Some(chrome) = &self.chrome_executable
            && chrome.as_os_str().is_empty()
        {
            return Err(invalid("chrome_executable", "must not be empty when set"));
        }

        if !self.quiet_provider {
            tracing::debug!("quiet_provider disabled; provider diagnostics will reach stderr");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rejected_field(config: AppConfig) -> String {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let lower = AppConfig { max_bytes: 1, timeout_ms: 100, ..Default::default() };
        let upper = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() };
        assert!(lower.validate().is_ok());
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values() {
        let cases = [
            (AppConfig { max_bytes: 0, ..Default::default() }, "max_bytes"),
            (AppConfig { max_bytes: 50 * 1024 * 1024 + 1, ..Default::default() }, "max_bytes"),
            (AppConfig { timeout_ms: 99, ..Default::default() }, "timeout_ms"),
            (AppConfig { timeout_ms: 300_001, ..Default::default() }, "timeout_ms"),
        ];

        for (config, field) in cases {
            assert_eq!(rejected_field(config), field);
        }
    }

    #[test]
    fn test_blank_strings_and_paths() {
        assert_eq!(rejected_field(AppConfig { user_agent: "   ".into(), ..Default::default() }), "user_agent");
        assert_eq!(rejected_field(AppConfig { cache_dir: Some(PathBuf::new()), ..Default::default() }), "cache_dir");
        assert_eq!(
            rejected_field(AppConfig { chrome_executable: Some(PathBuf::new()), ..Default::default() }),
            "chrome_executable"
        );
    }

    #[test]
    fn test_message_names_the_bounds() {
        let err = AppConfig { timeout_ms: 10, ..Default::default() }.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: timeout_ms - must be between 100ms and 300000ms");
    }
}
