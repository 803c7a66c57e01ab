//! Declaration Classifier
//!
//! Turns raw source text into a list of typed declarations. The classifier
//! is a pure boundary: no file-system or network access, and malformed
//! input degrades to skipped spans, never a hard failure.

mod typescript;

pub use typescript::TypeScriptClassifier;

use std::sync::Arc;

use crate::types::{Declaration, Result};

pub trait Classifier: Send + Sync {
    /// Produce zero or more declarations from one file's source text.
    fn classify(&self, source_text: &str) -> Result<Vec<Declaration>>;
}

/// Shared classifier handle.
pub type SharedClassifier = Arc<dyn Classifier + Send + Sync>;
