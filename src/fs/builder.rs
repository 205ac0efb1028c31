//! One-level tree construction.
//!
//! Neither entry point recurses: directory children come back as unloaded
//! placeholders and are only listed when expanded through the cache.

use std::path::Path;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::fs::source::FileSystem;
use crate::fs::tree::{is_hidden, node_name, sort_siblings, TreeNode};

/// Stat `path` and, if it is a directory, list its immediate children.
///
/// The returned root is loaded and its children are sorted.
pub fn build_top(fs: &dyn FileSystem, path: &Path) -> Result<TreeNode> {
    let meta = fs
        .stat(path)
        .map_err(|e| AppError::io("build_top", path, e))?;
    let mut root = TreeNode::from_meta(node_name(path), path.to_path_buf(), &meta);

    if root.is_dir() {
        root.children = list_children(fs, path, "build_top")?;
        root.is_loaded = true;
    }
    Ok(root)
}

/// List the immediate children of the directory at `path`, sorted.
pub fn expand_one_level(fs: &dyn FileSystem, path: &Path) -> Result<Vec<TreeNode>> {
    list_children(fs, path, "expand_one_level")
}

/// Best-effort listing: hidden entries and entries whose metadata cannot be
/// read are dropped; only a failure to list `path` itself is an error.
fn list_children(fs: &dyn FileSystem, path: &Path, op: &'static str) -> Result<Vec<TreeNode>> {
    let entries = fs.read_dir(path).map_err(|e| AppError::io(op, path, e))?;

    let mut children = Vec::with_capacity(entries.len());
    for entry in entries {
        if is_hidden(&entry.name) {
            continue;
        }
        let child_path = entry.path;
        match entry.meta {
            Ok(meta) => children.push(TreeNode::from_meta(entry.name, child_path, &meta)),
            Err(e) => {
                debug!(path = %child_path.display(), error = %e, "skipping unreadable entry");
            }
        }
    }
    sort_siblings(&mut children);
    Ok(children)
}
