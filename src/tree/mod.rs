//! Result Tree
//!
//! Maps a set of path-keyed generation results into a nested
//! folder-per-category tree for preview rendering, and owns the path logic
//! the archive writer reuses so that both views stay byte-identical.
//!
//! Expansion state survives rebuilds: the tree is reconstructed from scratch
//! on every result insert, then `merge_tree_state` carries `expanded` flags
//! forward by `(name, is_folder)` identity.

use serde::{Deserialize, Serialize};

use crate::constants::generation::FAQ_CATEGORY;
use crate::types::ResultSet;

/// One node of the preview tree.
///
/// File nodes keep the *original* result key in `path` so the UI can look up
/// content, while their display name already carries the rewritten `.md`
/// leaf the archive will use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub is_folder: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl TreeNode {
    fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            children: Vec::new(),
            path: None,
            expanded: Some(false),
        }
    }

    fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            children: Vec::new(),
            path: Some(path.into()),
            expanded: None,
        }
    }
}

/// Display folder for a category key. Unmapped categories fall back to
/// "Others"; the FAQ pseudo-category never reaches this (it lives at root).
pub fn folder_name(category: &str) -> &'static str {
    match category {
        "component" => "Components",
        "service" => "Services",
        "interceptor" => "Interceptors",
        "guard" => "Guards",
        "resolver" => "Resolvers",
        "directive" => "Directives",
        "pipe" => "Pipes",
        "module" => "Modules",
        "interface" => "Interfaces",
        "enum" => "Enums",
        "type" => "Types",
        "constant" => "Constants",
        _ => "Others",
    }
}

/// Markdown leaf for a source path: the basename stem (up to the first dot,
/// so `bar.component.ts` becomes `bar`) with a `.md` extension.
pub fn leaf_name(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let basename = normalized.rsplit('/').next().unwrap_or(&normalized);
    let stem = match basename.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => basename,
    };
    format!("{stem}.md")
}

/// Relative path of a result inside the archive. Must stay byte-identical
/// to the chain the preview tree displays for the same entry.
pub fn archive_path(category: &str, path: &str) -> String {
    let leaf = leaf_name(path);
    if category == FAQ_CATEGORY {
        leaf
    } else {
        format!("{}/{}", folder_name(category), leaf)
    }
}

/// Build a fresh tree from the result mapping. Every result contributes one
/// file node under its category folder; FAQ results sit at the root.
/// New folders start collapsed; use [`merge_tree_state`] to carry state over
/// from the previous tree.
pub fn build_tree(results: &ResultSet) -> Vec<TreeNode> {
    let mut tree: Vec<TreeNode> = Vec::new();

    for (path, result) in results.iter() {
        let leaf = leaf_name(path);

        if result.category == FAQ_CATEGORY {
            tree.push(TreeNode::file(leaf, path));
            continue;
        }

        let folder = folder_name(&result.category);
        let position = tree
            .iter()
            .position(|node| node.is_folder && node.name == folder)
            .unwrap_or_else(|| {
                tree.push(TreeNode::folder(folder));
                tree.len() - 1
            });
        tree[position].children.push(TreeNode::file(leaf, path));
    }

    tree
}

/// Carry expansion state from `old` into `new`. Nodes are matched by
/// `(name, is_folder)`, first match wins, recursively through children.
/// Unmatched new folders keep their collapsed default.
pub fn merge_tree_state(old: &[TreeNode], mut new: Vec<TreeNode>) -> Vec<TreeNode> {
    for node in &mut new {
        let previous = old
            .iter()
            .find(|o| o.name == node.name && o.is_folder == node.is_folder);
        if let Some(previous) = previous
            && node.is_folder
        {
            node.expanded = previous.expanded;
            node.children =
                merge_tree_state(&previous.children, std::mem::take(&mut node.children));
        }
    }
    new
}
