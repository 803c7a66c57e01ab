//! Core Data Model
//!
//! Shared types for the batch generation pipeline: the unified error type,
//! the declaration model produced by the classifier, and the path-keyed
//! result accumulator consumed by the tree builder and the archive writer.

pub mod declaration;
pub mod error;
pub mod result;

pub use declaration::{Category, Declaration};
pub use error::{DocsmithError, Result};
pub use result::{GenerationResult, ResultSet};
