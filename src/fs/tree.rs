use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fs::source::EntryMeta;

/// Type of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// A node in the project file tree.
///
/// Directory nodes start unloaded with no children. `children` is only a
/// faithful listing once `is_loaded` is set, so an empty unloaded directory
/// and an empty loaded one mean different things.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Byte count, files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Modification time as reported when the node was built.
    #[serde(rename = "lastModified")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    pub is_loaded: bool,
}

impl TreeNode {
    /// Create a node from one stat of the entry at `path`.
    ///
    /// Files come back loaded; directories come back as unloaded placeholders.
    pub fn from_meta(name: String, path: PathBuf, meta: &EntryMeta) -> Self {
        let modified = meta.modified.map(DateTime::<Utc>::from);
        if meta.is_dir {
            Self {
                name,
                path,
                node_type: NodeType::Directory,
                size: None,
                modified,
                children: Vec::new(),
                is_loaded: false,
            }
        } else {
            Self {
                name,
                path,
                node_type: NodeType::File,
                size: Some(meta.len),
                modified,
                children: Vec::new(),
                is_loaded: true,
            }
        }
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    /// Sort immediate children: directories first, then byte-order name.
    pub fn sort_children(&mut self) {
        sort_siblings(&mut self.children);
    }

    /// Sort every materialized level, deepest first.
    pub fn sort_recursive(&mut self) {
        for child in self.children.iter_mut() {
            child.sort_recursive();
        }
        self.sort_children();
    }

    /// Find a node by path among the materialized nodes (depth-first).
    pub fn find_node(&self, target: &Path) -> Option<&TreeNode> {
        if self.path == target {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_node(target))
    }

    /// Find a mutable reference to a node by path.
    pub fn find_node_mut(&mut self, target: &Path) -> Option<&mut TreeNode> {
        if self.path == target {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let Some(found) = child.find_node_mut(target) {
                return Some(found);
            }
        }
        None
    }
}

/// Names starting with a dot are never materialized.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Base name for a node at `path`, falling back to the whole path for roots.
pub fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Order one level of siblings: directories first, then byte-order name.
pub fn sort_siblings(nodes: &mut [TreeNode]) {
    nodes.sort_by(compare_siblings);
}

fn compare_siblings(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
}
