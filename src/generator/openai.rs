//! OpenAI API Generator
//!
//! Generator backed by OpenAI's Chat Completions API. Builds per-kind
//! system/user message pairs and maps HTTP 429 to the rate-limited signal
//! the retrying caller backs off on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GeneratedText, GenerationKind, GenerationRequest, Generator, GeneratorConfig};
use crate::types::{DocsmithError, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI generator with secure API key handling
pub struct OpenAiGenerator {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                DocsmithError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocsmithError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let (system, user) = build_messages(request);

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        }
    }
}

/// Per-kind prompt pair.
fn build_messages(request: &GenerationRequest) -> (String, String) {
    let relative_path = request.relative_path.as_deref().unwrap_or("unknown");

    match request.kind {
        GenerationKind::Documentation => {
            let template = request.template.as_deref().unwrap_or_default();
            let system = format!(
                "Strictly using the following template:\n{template}\n\n\
                 Don't give any additional explanation, don't include anything like \
                 \"html-template\" with the whole component code. Generate detailed \
                 documentation in markdown format for the Angular code provided by the \
                 user. Always include the path to the component in the description of \
                 the component."
            );
            let user = format!(
                "Here is the Angular code found in this relativePath({relative_path}) \
                 that I want to generate documentation for:\n{}",
                request.source_text
            );
            (system, user)
        }
        GenerationKind::Instructions => {
            let system = "You are a helpful assistant and you are instructed to, based on \
                 the code provided by the user, generate instructions for the final user \
                 of the application, explaining how to use the component. You should \
                 generate a markdown file with the instructions for the final user. \
                 Don't give any additional explanation, don't include any code in the \
                 instructions and don't wrap it all in a code block. Keep in mind that \
                 the user is not a developer."
                .to_string();
            let user = format!(
                "Here is the Angular code that I want to generate instructions for:\n{}",
                request.source_text
            );
            (system, user)
        }
        GenerationKind::Faq => {
            let system = "You are a helpful assistant. Based on the user instructions \
                 provided, generate a list of frequently asked questions with clear \
                 answers, in markdown format. Don't give any additional explanation and \
                 don't include any code. Keep in mind that the reader is not a developer."
                .to_string();
            let user = format!(
                "Here are the user instructions to synthesize FAQs from:\n{}",
                request.source_text
            );
            (system, user)
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText> {
        info!(
            kind = ?request.kind,
            model = %self.model,
            "generating with OpenAI"
        );

        let body = self.build_request(request);
        let url = format!("{}/chat/completions", self.api_base);

        debug!("sending request to OpenAI API");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DocsmithError::Transport(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DocsmithError::Transport(format!("Failed to parse OpenAI response: {e}")))?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocsmithError::Transport("No content in OpenAI response".to_string()))?;

        Ok(GeneratedText { content })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn error_for_status(status: StatusCode, body: String) -> DocsmithError {
    DocsmithError::from_http_status(status.as_u16(), body)
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
