//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{retry as retry_constants, templates as template_constants};
use crate::generator::{GeneratorConfig, RetryPolicy};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Remote generation API settings
    pub generator: GeneratorConfig,

    /// Backoff retry settings
    pub retry: RetryConfig,

    /// Template resolution settings
    pub templates: TemplatesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            generator: GeneratorConfig::default(),
            retry: RetryConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocsmithError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(crate::types::DocsmithError::Config(format!(
                "generator temperature must be between 0.0 and 2.0, got {}",
                self.generator.temperature
            )));
        }

        if self.generator.timeout_secs == 0 {
            return Err(crate::types::DocsmithError::Config(
                "generator timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.retry.backoff_factor < 1.0 {
            return Err(crate::types::DocsmithError::Config(format!(
                "retry backoff_factor must be at least 1.0, got {}",
                self.retry.backoff_factor
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay between attempts
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry_constants::MAX_RETRIES,
            initial_delay_ms: retry_constants::INITIAL_DELAY_MS,
            backoff_factor: retry_constants::BACKOFF_FACTOR,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: std::time::Duration::from_millis(self.initial_delay_ms),
            backoff_factor: self.backoff_factor,
        }
    }
}

// =============================================================================
// Templates Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory holding one markdown template per category
    pub dir: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(template_constants::DEFAULT_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_default_retry_matches_call_site_tuning() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.initial_delay_ms, 60_000);
        assert_eq!(retry.backoff_factor, 2.0);
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = Config::default();
        config.generator.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shrinking_backoff_rejected() {
        let mut config = Config::default();
        config.retry.backoff_factor = 0.5;
        assert!(config.validate().is_err());
    }
}
