//! Source File Collection
//!
//! Walks an uploaded/selected directory and loads the files the pipeline
//! cares about: TypeScript sources for classification and HTML files so
//! component template references can be resolved against the same set.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

use crate::types::Result;

/// Extensions the pipeline loads
const SOURCE_EXTENSIONS: &[&str] = &["ts", "html"];

/// Default directories to skip
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    ".git",
    "build",
    "coverage",
    ".angular",
];

/// One selected file with its path relative to the selection root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub relative_path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

pub struct FileCollector {
    root: PathBuf,
}

impl FileCollector {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Collect `.ts` and `.html` files under the root, sorted by relative
    /// path. Unreadable or non-UTF-8 files are skipped with a warning.
    pub fn collect(&self) -> Result<Vec<SourceFile>> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || self.should_skip(path) || !has_source_extension(path) {
                continue;
            }

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };

            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            files.push(SourceFile::new(relative, content));
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    fn should_skip(&self, path: &Path) -> bool {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .any(|component| {
                component
                    .as_os_str()
                    .to_str()
                    .map(|name| DEFAULT_SKIP_DIRS.contains(&name))
                    .unwrap_or(false)
            })
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collects_ts_and_html_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app/b.service.ts", "class B {}");
        write(dir.path(), "src/app/a.component.ts", "class A {}");
        write(dir.path(), "src/app/a.component.html", "<div></div>");
        write(dir.path(), "src/assets/logo.svg", "<svg/>");

        let files = FileCollector::new(dir.path()).collect().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "src/app/a.component.html",
                "src/app/a.component.ts",
                "src/app/b.service.ts",
            ]
        );
    }

    #[test]
    fn test_skips_default_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/x.ts", "x");
        write(dir.path(), "node_modules/lib/y.ts", "y");
        write(dir.path(), "dist/z.ts", "z");

        let files = FileCollector::new(dir.path()).collect().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["src/x.ts"]);
    }
}
