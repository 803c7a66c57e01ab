//! Declaration Model
//!
//! One classified unit of source code: a class, interface, enum, type alias,
//! or exported constant, tagged with the semantic role that determines its
//! documentation template and archive folder.

use serde::{Deserialize, Serialize};

/// Semantic role of a declaration.
///
/// Assigned exactly once by the classifier; everything downstream matches on
/// the closed enum instead of re-inspecting decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Component,
    Service,
    Interceptor,
    Guard,
    Resolver,
    Directive,
    Pipe,
    Module,
    Interface,
    Enum,
    #[serde(rename = "type")]
    TypeAlias,
    Constant,
}

impl Category {
    /// Stable lowercase key used for template lookup and result storage.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Service => "service",
            Self::Interceptor => "interceptor",
            Self::Guard => "guard",
            Self::Resolver => "resolver",
            Self::Directive => "directive",
            Self::Pipe => "pipe",
            Self::Module => "module",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::TypeAlias => "type",
            Self::Constant => "constant",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One classified declaration with its exact source span.
///
/// The classifier fills `name`, `category`, `source_text` and (for
/// components with an external template) `template_reference`.
/// `relative_path` is attached by the orchestrator after classification;
/// the classifier itself never sees file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub name: Option<String>,
    pub category: Category,
    pub source_text: String,
    pub relative_path: Option<String>,
    pub template_reference: Option<String>,
}

impl Declaration {
    pub fn new(category: Category, source_text: impl Into<String>) -> Self {
        Self {
            name: None,
            category,
            source_text: source_text.into(),
            relative_path: None,
            template_reference: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_are_lowercase() {
        assert_eq!(Category::Component.key(), "component");
        assert_eq!(Category::TypeAlias.key(), "type");
        assert_eq!(Category::Module.to_string(), "module");
    }

    #[test]
    fn test_category_serde_round_trip() {
        let json = serde_json::to_string(&Category::TypeAlias).unwrap();
        assert_eq!(json, "\"type\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::TypeAlias);
    }
}
