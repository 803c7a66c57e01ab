//! Configuration
//!
//! Layered configuration for the generation pipeline: built-in defaults,
//! an optional project `docsmith.toml`, and `DOCSMITH_*` environment
//! variables, merged in that order.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{Config, RetryConfig, TemplatesConfig};
