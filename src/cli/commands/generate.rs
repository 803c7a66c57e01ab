//! `generate` Command
//!
//! Wires the pipeline together: collect files, construct the collaborators,
//! run the requested batch jobs, and write the resulting archives.
//! Documentation and instructions run concurrently for `all`, as
//! independent cooperative flows sharing one progress tracker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::archive;
use crate::batch::{BatchOrchestrator, TemplateStore};
use crate::classifier::{SharedClassifier, TypeScriptClassifier};
use crate::cli::render::spawn_renderer;
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::constants::archive as archive_constants;
use crate::generator::create_generator;
use crate::progress::{ProgressTracker, SharedTracker};
use crate::scanner::FileCollector;
use crate::tree::{self, TreeNode};
use crate::types::{Result, ResultSet};

/// Which artifacts to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateKind {
    Documentation,
    Instructions,
    Faqs,
    All,
}

pub struct GenerateOptions {
    pub path: PathBuf,
    pub kind: GenerateKind,
    pub output_dir: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let output = Output::new();
    let config = ConfigLoader::load()?;

    let mut generator_config = config.generator.clone();
    if let Some(model) = options.model {
        generator_config.model = Some(model);
    }
    if let Some(api_base) = options.api_base {
        generator_config.api_base = Some(api_base);
    }
    let templates_dir = options
        .templates_dir
        .unwrap_or_else(|| config.templates.dir.clone());

    let files = FileCollector::new(&options.path).collect()?;
    output.info(&format!(
        "Collected {} source files from {}",
        files.len(),
        options.path.display()
    ));

    let classifier: SharedClassifier = Arc::new(TypeScriptClassifier::new());
    let generator = create_generator(&generator_config)?;
    let tracker: SharedTracker = Arc::new(ProgressTracker::new());
    let orchestrator = BatchOrchestrator::new(
        classifier,
        generator,
        tracker.clone(),
        TemplateStore::new(templates_dir),
        config.retry.policy(),
    );

    let renderer = spawn_renderer(tracker.subscribe());
    std::fs::create_dir_all(&options.output_dir)?;

    let outcome = run_jobs(&orchestrator, &files, options.kind, &options.output_dir, &output).await;

    renderer.abort();
    outcome
}

async fn run_jobs(
    orchestrator: &BatchOrchestrator,
    files: &[crate::scanner::SourceFile],
    kind: GenerateKind,
    output_dir: &Path,
    output: &Output,
) -> Result<()> {
    match kind {
        GenerateKind::Documentation => {
            let results = orchestrator.run_documentation(files).await?;
            write_named(
                output,
                &results,
                output_dir,
                archive_constants::DOCUMENTATION_FILE,
            )?;
        }
        GenerateKind::Instructions => {
            let results = orchestrator.run_instructions(files).await?;
            write_named(
                output,
                &results,
                output_dir,
                archive_constants::INSTRUCTIONS_FILE,
            )?;
        }
        GenerateKind::Faqs => {
            let instructions = orchestrator.run_instructions(files).await?;
            let faqs = orchestrator.run_faqs(&instructions).await?;
            write_named(output, &faqs, output_dir, archive_constants::FAQS_FILE)?;
        }
        GenerateKind::All => {
            // Two independent cooperative flows, one tracker, distinct keys.
            let (documentation, instructions) = tokio::join!(
                orchestrator.run_documentation(files),
                orchestrator.run_instructions(files),
            );
            let documentation = documentation?;
            let instructions = instructions?;
            let faqs = orchestrator.run_faqs(&instructions).await?;

            write_named(
                output,
                &documentation,
                output_dir,
                archive_constants::DOCUMENTATION_FILE,
            )?;
            write_named(
                output,
                &instructions,
                output_dir,
                archive_constants::INSTRUCTIONS_FILE,
            )?;
            write_named(output, &faqs, output_dir, archive_constants::FAQS_FILE)?;
        }
    }
    Ok(())
}

fn write_named(output: &Output, results: &ResultSet, dir: &Path, name: &str) -> Result<()> {
    if results.is_empty() {
        output.warning(&format!("No results to package for {name}"));
        return Ok(());
    }
    let dest = dir.join(name);
    archive::write_archive(results, &dest)?;
    output.success(&format!(
        "{} documents -> {}",
        results.len(),
        dest.display()
    ));
    for node in tree::build_tree(results) {
        print_node(output, &node, 0);
    }
    Ok(())
}

fn print_node(output: &Output, node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.is_folder {
        output.detail(&format!("{indent}{}/", node.name));
    } else {
        output.detail(&format!("{indent}{}", node.name));
    }
    for child in &node.children {
        print_node(output, child, depth + 1);
    }
}
