//! Batch Orchestration
//!
//! Drives one batch job end to end: classify the selected files, resolve a
//! per-item context, call the generator through the retrying caller, and
//! accumulate results keyed by original path while a progress record tracks
//! the run. Collaborators (classifier, generator, progress tracker) are
//! injected at construction.
//!
//! Items are processed sequentially on purpose: the external API is rate
//! limited, and one in-flight call per job is the throttle. Distinct jobs
//! may still run concurrently under their own progress keys.
//!
//! ## Failure tiers
//!
//! - Rate limiting is absorbed by the retrying caller.
//! - Any other per-item failure (context resolution, generation, one file
//!   failing to classify) is logged and the item skipped.
//! - A failure outside the per-item loop aborts the batch with one generic
//!   error; the progress record is removed on every exit path.

pub mod templates;

pub use templates::TemplateStore;

use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::classifier::SharedClassifier;
use crate::constants::generation;
use crate::constants::progress as progress_keys;
use crate::generator::{
    GeneratedText, GenerationKind, GenerationRequest, RetryPolicy, RetryTick, SharedGenerator,
    call_with_retry,
};
use crate::progress::{ProgressGuard, ProgressUpdate, SharedTracker};
use crate::scanner::SourceFile;
use crate::types::{
    Category, Declaration, DocsmithError, GenerationResult, Result, ResultSet,
};

/// User-visible message for batch-fatal failures. Item-level detail stays
/// in the logs.
const BATCH_ERROR_MESSAGE: &str = "An error occurred while processing the files.";

/// Explicit change notifications, replacing re-render-by-mutation: any UI
/// layer subscribes and rebuilds its view per event.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// A result was stored for `path` in the job `key`'s mapping.
    ResultStored { key: String, path: String },
    /// The job finished; skipped counts items dropped by per-item failures.
    Completed {
        key: String,
        generated: usize,
        skipped: usize,
    },
    /// The job hit a batch-fatal failure.
    Failed { key: String, message: String },
}

fn is_component(declaration: &Declaration) -> bool {
    declaration.category == Category::Component
}

pub struct BatchOrchestrator {
    classifier: SharedClassifier,
    generator: SharedGenerator,
    tracker: SharedTracker,
    templates: TemplateStore,
    retry: RetryPolicy,
    events: broadcast::Sender<BatchEvent>,
}

impl BatchOrchestrator {
    pub fn new(
        classifier: SharedClassifier,
        generator: SharedGenerator,
        tracker: SharedTracker,
        templates: TemplateStore,
        retry: RetryPolicy,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            classifier,
            generator,
            tracker,
            templates,
            retry,
            events,
        }
    }

    /// Subscribe to result/completion events.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.events.subscribe()
    }

    /// Generate reference documentation for every classified declaration,
    /// using the category template for each.
    #[instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn run_documentation(&self, files: &[SourceFile]) -> Result<ResultSet> {
        self.run_batch(files, None, progress_keys::DOCUMENTATION, |decl, _files| {
            let template = self.templates.category_template(decl.category)?;
            Ok(GenerationRequest {
                kind: GenerationKind::Documentation,
                relative_path: decl.relative_path.clone(),
                source_text: decl.source_text.clone(),
                template: Some(template),
            })
        })
        .await
    }

    /// Generate end-user instructions for component declarations only,
    /// combining each component's source with its resolved HTML template.
    #[instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn run_instructions(&self, files: &[SourceFile]) -> Result<ResultSet> {
        self.run_batch(
            files,
            Some(is_component),
            progress_keys::INSTRUCTIONS,
            |decl, files| {
                let html = templates::resolve_template_reference(decl, files)?;
                Ok(GenerationRequest {
                    kind: GenerationKind::Instructions,
                    relative_path: decl.relative_path.clone(),
                    source_text: format!("{}\n\nTemplate HTML:\n{}", decl.source_text, html),
                    template: None,
                })
            },
        )
        .await
    }

    /// Synthesize one FAQ document from the aggregated instruction text.
    /// An empty instruction set produces an empty result without calling
    /// the generator.
    #[instrument(skip(self, instructions), fields(instruction_count = instructions.len()))]
    pub async fn run_faqs(&self, instructions: &ResultSet) -> Result<ResultSet> {
        let key = progress_keys::FAQS;
        let _guard = ProgressGuard::new(self.tracker.clone(), key);

        let mut results = ResultSet::new();
        if instructions.is_empty() {
            info!("no instructions available, skipping FAQ synthesis");
            return Ok(results);
        }

        self.tracker.set(
            key,
            ProgressUpdate::default()
                .visible(true)
                .total(1)
                .status("Synthesizing FAQs"),
        );

        let aggregated: Vec<&str> = instructions.iter().map(|(_, r)| r.content.as_str()).collect();
        let request = GenerationRequest {
            kind: GenerationKind::Faq,
            relative_path: None,
            source_text: aggregated.join(generation::AGGREGATE_SEPARATOR),
            template: None,
        };

        let outcome = self.generate_with_retry(key, &request).await;
        self.tracker.set(key, ProgressUpdate::default().completed(1));

        match outcome {
            Ok(text) => {
                results.insert(
                    generation::FAQ_KEY,
                    GenerationResult {
                        category: generation::FAQ_CATEGORY.to_string(),
                        content: text.content,
                    },
                );
                let _ = self.events.send(BatchEvent::ResultStored {
                    key: key.to_string(),
                    path: generation::FAQ_KEY.to_string(),
                });
                let _ = self.events.send(BatchEvent::Completed {
                    key: key.to_string(),
                    generated: 1,
                    skipped: 0,
                });
            }
            Err(err) => {
                warn!(error = %err, "FAQ synthesis failed");
                let _ = self.events.send(BatchEvent::Completed {
                    key: key.to_string(),
                    generated: 0,
                    skipped: 1,
                });
            }
        }

        Ok(results)
    }

    /// Core sequential loop shared by the per-declaration jobs.
    async fn run_batch<F>(
        &self,
        files: &[SourceFile],
        filter: Option<fn(&Declaration) -> bool>,
        key: &str,
        resolve: F,
    ) -> Result<ResultSet>
    where
        F: Fn(&Declaration, &[SourceFile]) -> Result<GenerationRequest>,
    {
        // Guard first: the record must be removed on every exit path,
        // including batch-fatal errors below.
        let _guard = ProgressGuard::new(self.tracker.clone(), key);
        self.tracker.set(
            key,
            ProgressUpdate::default()
                .visible(true)
                .status("Classifying source files"),
        );

        match self.run_batch_inner(files, filter, key, resolve).await {
            Ok((results, skipped)) => {
                info!(key, generated = results.len(), skipped, "batch finished");
                let _ = self.events.send(BatchEvent::Completed {
                    key: key.to_string(),
                    generated: results.len(),
                    skipped,
                });
                Ok(results)
            }
            Err(err) => {
                warn!(key, error = %err, "batch failed");
                let _ = self.events.send(BatchEvent::Failed {
                    key: key.to_string(),
                    message: BATCH_ERROR_MESSAGE.to_string(),
                });
                Err(DocsmithError::Batch {
                    key: key.to_string(),
                    message: BATCH_ERROR_MESSAGE.to_string(),
                })
            }
        }
    }

    async fn run_batch_inner<F>(
        &self,
        files: &[SourceFile],
        filter: Option<fn(&Declaration) -> bool>,
        key: &str,
        resolve: F,
    ) -> Result<(ResultSet, usize)>
    where
        F: Fn(&Declaration, &[SourceFile]) -> Result<GenerationRequest>,
    {
        let mut declarations = self.classify_files(files);
        if let Some(filter) = filter {
            declarations.retain(|d| filter(d));
        }

        self.tracker.set(
            key,
            ProgressUpdate::default()
                .total(declarations.len())
                .status(format!("Generating {} items", declarations.len())),
        );

        let mut results = ResultSet::new();
        let mut skipped = 0usize;

        for (index, declaration) in declarations.iter().enumerate() {
            let label = declaration.relative_path.as_deref().unwrap_or("<unknown>");
            self.tracker
                .set(key, ProgressUpdate::default().status(format!("Processing {label}")));

            match self.process_item(key, declaration, files, &resolve).await {
                Ok(text) => {
                    let path = declaration.relative_path.clone().unwrap_or_default();
                    results.insert(
                        path.clone(),
                        GenerationResult {
                            category: declaration.category.key().to_string(),
                            content: text.content,
                        },
                    );
                    let _ = self.events.send(BatchEvent::ResultStored {
                        key: key.to_string(),
                        path,
                    });
                }
                Err(err) => {
                    skipped += 1;
                    warn!(item = label, error = %err, "skipping item");
                }
            }

            // Progress counts processed items, not successes.
            self.tracker
                .set(key, ProgressUpdate::default().completed(index + 1));
        }

        Ok((results, skipped))
    }

    /// Classify every file, concatenating declarations in file order and
    /// attaching each file's relative path. A file that fails to classify
    /// is skipped; the batch continues.
    fn classify_files(&self, files: &[SourceFile]) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for file in files {
            match self.classifier.classify(&file.content) {
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
        declarations
    }

    async fn process_item<F>(
        &self,
        key: &str,
        declaration: &Declaration,
        files: &[SourceFile],
        resolve: &F,
    ) -> Result<GeneratedText>
    where
        F: Fn(&Declaration, &[SourceFile]) -> Result<GenerationRequest>,
    {
        let request = resolve(declaration, files)?;
        self.generate_with_retry(key, &request).await
    }

    /// One generator call through the retrying caller, mirroring the
    /// countdown into the job's progress record.
    async fn generate_with_retry(
        &self,
        key: &str,
        request: &GenerationRequest,
    ) -> Result<GeneratedText> {
        let tracker = &self.tracker;
        call_with_retry(
            self.retry,
            || self.generator.generate(request),
            |tick| match tick {
                RetryTick::Waiting { seconds_remaining } => tracker.set(
                    key,
                    ProgressUpdate::default()
                        .waiting(true)
                        .countdown(Some(seconds_remaining)),
                ),
                RetryTick::Idle => tracker.set(
                    key,
                    ProgressUpdate::default().waiting(false).countdown(None),
                ),
            },
        )
        .await
    }
}
