//! Generation API Boundary
//!
//! Defines the [`Generator`] trait the batch orchestrator calls through the
//! retrying caller. The remote service is an opaque collaborator: it takes
//! a declaration's source (plus an optional template) and returns generated
//! markdown, failing with a distinguishable rate-limited signal.

mod openai;
pub mod retry;

pub use openai::OpenAiGenerator;
pub use retry::{RetryPolicy, RetryTick, call_with_retry};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::network;
use crate::types::{DocsmithError, Result};

/// What kind of document a call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    /// Template-driven reference documentation for one declaration.
    Documentation,
    /// End-user instructions for one component (source + resolved HTML).
    Instructions,
    /// FAQ synthesis over aggregated instruction text.
    Faq,
}

/// One fully resolved generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    /// Original path of the declaration, embedded in documentation prompts.
    pub relative_path: Option<String>,
    pub source_text: String,
    /// Category template (documentation kind only).
    pub template: Option<String>,
}

/// Successful generation output.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub content: String,
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce generated text for the request.
    ///
    /// Rate limiting must surface as [`DocsmithError::RateLimited`]; every
    /// other failure is treated as permanent for the calling item.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText>;

    /// Generator name for logging.
    fn name(&self) -> &str;
}

/// Shared generator handle for concurrent batch jobs.
pub type SharedGenerator = Arc<dyn Generator + Send + Sync>;

// =============================================================================
// Generator Configuration
// =============================================================================

/// Configuration for the remote generation API.
///
/// The API key is never serialized to output and is redacted in debug
/// output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Provider type; "openai" is the only built-in.
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// API key; never serialized back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            max_tokens: 4096,
        }
    }
}

/// Create a shared generator from configuration.
pub fn create_generator(config: &GeneratorConfig) -> Result<SharedGenerator> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiGenerator::new(config.clone())?)),
        other => Err(DocsmithError::Config(format!(
            "Unknown generator provider: {}. Supported: openai",
            other
        ))),
    }
}
