//! `config` Command

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{DocsmithError, Result};

/// Show the merged effective configuration.
pub fn show(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => println!(
            "{}",
            toml::to_string_pretty(&config).map_err(|e| DocsmithError::Config(e.to_string()))?
        ),
    }
    Ok(())
}

/// Show the project config path.
pub fn path() -> Result<()> {
    let project = ConfigLoader::project_config_path();
    let exists = if project.exists() { "✓" } else { "✗" };
    println!("  Project: {} {}", exists, project.display());
    Ok(())
}

/// Write a default project config.
pub fn init(force: bool) -> Result<()> {
    let output = Output::new();
    let path = ConfigLoader::init_project(force)?;
    output.success(&format!("Config ready: {}", path.display()));
    Ok(())
}
