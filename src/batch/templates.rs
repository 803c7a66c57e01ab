//! Template Resolution
//!
//! Two lookups feed the orchestrator: the per-category documentation
//! template loaded from `assets/templates/{category}.md`, and a component's
//! own HTML template resolved by its `templateUrl` against the uploaded
//! file set.

use std::path::PathBuf;

use crate::scanner::SourceFile;
use crate::types::{Category, Declaration, DocsmithError, Result};

/// Loads category documentation templates from a directory on disk.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read `{dir}/{category}.md`. A missing or unreadable template is a
    /// hard skip for the item that needed it.
    pub fn category_template(&self, category: Category) -> Result<String> {
        let path = self.dir.join(format!("{}.md", category.key()));
        std::fs::read_to_string(&path).map_err(|_| DocsmithError::TemplateMissing {
            path: path.to_string_lossy().to_string(),
        })
    }
}

/// Resolve a component declaration's `templateUrl` against the uploaded
/// file set: the reference is taken relative to the component's own
/// directory and matched by path suffix.
///
/// A component with no `templateUrl` resolves to an empty string; a
/// reference that matches no uploaded file is a per-item failure.
pub fn resolve_template_reference(
    declaration: &Declaration,
    files: &[SourceFile],
) -> Result<String> {
    let Some(reference) = &declaration.template_reference else {
        return Ok(String::new());
    };

    let component_dir = declaration
        .relative_path
        .as_deref()
        .and_then(|path| path.rsplit_once('/'))
        .map(|(dir, _)| dir)
        .unwrap_or("");

    let reference = reference.trim_start_matches("./");
    let target = if component_dir.is_empty() {
        reference.to_string()
    } else {
        format!("{component_dir}/{reference}")
    };

    files
        .iter()
        .find(|file| file.relative_path.ends_with(&target))
        .map(|file| file.content.clone())
        .ok_or(DocsmithError::TemplateReferenceMissing { path: target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn component(path: &str, reference: Option<&str>) -> Declaration {
        Declaration {
            name: Some("TestComponent".to_string()),
            category: Category::Component,
            source_text: "class TestComponent {}".to_string(),
            relative_path: Some(path.to_string()),
            template_reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn test_category_template_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("component.md"), "# Component template").unwrap();

        let store = TemplateStore::new(dir.path());
        let template = store.category_template(Category::Component).unwrap();
        assert_eq!(template, "# Component template");
    }

    #[test]
    fn test_missing_category_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        assert!(matches!(
            store.category_template(Category::Service),
            Err(DocsmithError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn test_resolves_sibling_template() {
        let files = vec![
            SourceFile::new("project/src/app/upload/upload.component.ts", "ts"),
            SourceFile::new("project/src/app/upload/upload.component.html", "<form>"),
        ];
        let declaration = component(
            "project/src/app/upload/upload.component.ts",
            Some("./upload.component.html"),
        );

        let html = resolve_template_reference(&declaration, &files).unwrap();
        assert_eq!(html, "<form>");
    }

    #[test]
    fn test_no_reference_resolves_to_empty() {
        let declaration = component("src/app/inline.component.ts", None);
        assert_eq!(resolve_template_reference(&declaration, &[]).unwrap(), "");
    }

    #[test]
    fn test_missing_referenced_file_is_an_error() {
        let files = vec![SourceFile::new("src/app/a.component.ts", "ts")];
        let declaration = component("src/app/a.component.ts", Some("./a.component.html"));
        assert!(matches!(
            resolve_template_reference(&declaration, &files),
            Err(DocsmithError::TemplateReferenceMissing { .. })
        ));
    }
}
