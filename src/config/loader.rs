//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (docsmith.toml)
//! 3. Environment variables (DOCSMITH_* prefix)

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use super::types::Config;
use crate::types::{DocsmithError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → project file → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DOCSMITH_GENERATOR_MODEL -> generator.model
        figment = figment.merge(Env::prefixed("DOCSMITH_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocsmithError::Config(format!("Configuration error: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocsmithError::Config(format!("Configuration error: {e}")))
    }

    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("docsmith.toml")
    }

    /// Write a default project config if none exists; returns its path.
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let path = Self::project_config_path();
        if !path.exists() || force {
            std::fs::write(&path, Self::default_project_config())?;
        }
        Ok(path)
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# Docsmith Project Configuration

version = "1.0"

# Remote generation API
[generator]
provider = "openai"
model = "gpt-4o-mini"
timeout_secs = 300
# api_key is read from OPENAI_API_KEY if unset here

# Backoff retry on rate limiting
[retry]
max_retries = 5
initial_delay_ms = 60000
backoff_factor = 2.0

# Category documentation templates
[templates]
dir = "assets/templates"
"#
        .to_string()
    }
}
