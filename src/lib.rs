//! Docsmith - Batch AI Documentation Generator for Angular Codebases
//!
//! Takes a tree of TypeScript sources, classifies each file's declarations
//! into categories (component, service, guard, ...), sends each declaration
//! to a remote text-generation API with backoff retry on rate limiting, and
//! packages the results into a zip archive laid out one folder per
//! category. A path-keyed tree of the same results backs live preview
//! rendering, and a progress registry broadcasts per-batch state.
//!
//! ## Pipeline
//!
//! selected files → [`classifier`] → declarations → [`batch`] →
//! generator calls via backoff retry → [`types::ResultSet`] →
//! [`tree`] (preview) and [`archive`] (download)
//!
//! ## Modules
//!
//! - [`classifier`]: tree-sitter based declaration classification
//! - [`generator`]: generation API boundary with retrying caller
//! - [`batch`]: sequential batch orchestration with per-item error scope
//! - [`progress`]: observable per-batch progress registry
//! - [`tree`] / [`archive`]: result tree building and zip packaging
//! - [`config`]: layered configuration

pub mod archive;
pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod generator;
pub mod progress;
pub mod scanner;
pub mod tree;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{DocsmithError, Result};

// Data Model
pub use types::{Category, Declaration, GenerationResult, ResultSet};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use batch::{BatchEvent, BatchOrchestrator, TemplateStore};
pub use classifier::{Classifier, SharedClassifier, TypeScriptClassifier};
pub use generator::{
    GeneratedText, GenerationKind, GenerationRequest, Generator, GeneratorConfig, RetryPolicy,
    RetryTick, SharedGenerator, call_with_retry, create_generator,
};
pub use progress::{
    ProgressGuard, ProgressRecord, ProgressTracker, ProgressUpdate, SharedTracker,
};
pub use scanner::{FileCollector, SourceFile};
pub use tree::{TreeNode, build_tree, folder_name, merge_tree_state};

pub use archive::{build_archive, write_archive};
