//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! The taxonomy follows three tiers: transient throttling (recovered by
//! backoff retry), permanent per-item failures (logged and skipped), and
//! batch-fatal failures (abort the remaining items).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsmithError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // -------------------------------------------------------------------------
    // Generation Errors
    // -------------------------------------------------------------------------
    /// The generation API rejected the call because of rate limiting.
    /// This is the only failure the retrying caller will back off on.
    #[error("generation API rate limited (429): {message}")]
    RateLimited { message: String },

    /// Any non-429 API rejection.
    #[error("generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request never produced an HTTP status (connect/serialize failures).
    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("max retries reached after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("template not found: {path}")]
    TemplateMissing { path: String },

    #[error("referenced template file not found: {path}")]
    TemplateReferenceMissing { path: String },

    #[error("parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("batch '{key}' failed: {message}")]
    Batch { key: String, message: String },

    #[error("config error: {0}")]
    Config(String),
}

impl DocsmithError {
    /// Map an HTTP status code from the generation API to an error.
    /// 429 is the distinguished throttling signal; everything else is a
    /// permanent failure for the item that triggered it.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 {
            Self::RateLimited { message }
        } else {
            Self::Api { status, message }
        }
    }

    /// Check whether this is the throttling signal that permits retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, DocsmithError>;
