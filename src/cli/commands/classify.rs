//! `classify` Command
//!
//! Runs only the static-analysis half of the pipeline and prints what the
//! classifier found, as text or JSON. Useful for checking category
//! assignment before spending API calls.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::classifier::{Classifier, TypeScriptClassifier};
use crate::cli::ui::Output;
use crate::scanner::FileCollector;
use crate::types::{Declaration, Result};

#[derive(Serialize)]
struct DeclarationSummary<'a> {
    name: Option<&'a str>,
    category: &'a str,
    relative_path: Option<&'a str>,
    template_reference: Option<&'a str>,
}

impl<'a> From<&'a Declaration> for DeclarationSummary<'a> {
    fn from(declaration: &'a Declaration) -> Self {
        Self {
            name: declaration.name.as_deref(),
            category: declaration.category.key(),
            relative_path: declaration.relative_path.as_deref(),
            template_reference: declaration.template_reference.as_deref(),
        }
    }
}

pub fn run(path: &Path, format: &str) -> Result<()> {
    let output = Output::new();
    let files = FileCollector::new(path).collect()?;
    let classifier = TypeScriptClassifier::new();

    let mut declarations = Vec::new();
    for file in &files {
        match classifier.classify(&file.content) {
            Ok(mut file_declarations) => {
                for declaration in &mut file_declarations {
                    declaration.relative_path = Some(file.relative_path.clone());
                }
                declarations.extend(file_declarations);
            }
            Err(err) => {
                warn!(path = %file.relative_path, error = %err, "skipping file that failed to classify");
            }
        }
    }

    match format {
        "json" => {
            let summaries: Vec<DeclarationSummary> =
                declarations.iter().map(Into::into).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        _ => {
            output.header(&format!("{} declarations", declarations.len()));
            for declaration in &declarations {
                println!(
                    "  {:<12} {:<32} {}",
                    declaration.category.key(),
                    declaration.name.as_deref().unwrap_or("-"),
                    declaration.relative_path.as_deref().unwrap_or("-"),
                );
            }
        }
    }

    Ok(())
}
