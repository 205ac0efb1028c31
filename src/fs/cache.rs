//! Project tree cache.
//!
//! One reader/writer lock guards every cached project. Cache hits take the
//! read lock; everything that touches the filesystem or mutates the map holds
//! the write lock for its whole duration, so all mutations are serialized
//! across projects.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::fs::builder::{build_top, expand_one_level};
use crate::fs::operations;
use crate::fs::source::{FileSystem, OsFileSystem};
use crate::fs::tree::TreeNode;

/// Which cached projects a save invalidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveInvalidation {
    /// Every cached root that contains the saved file.
    #[default]
    CachedAncestors,
    /// Only the entry keyed by the saved file's parent directory.
    ParentDir,
}

impl SaveInvalidation {
    /// Parse from a config string. Unknown values fall back to the default.
    pub fn from_str(s: &str) -> Self {
        match s {
            "parent_dir" => SaveInvalidation::ParentDir,
            _ => SaveInvalidation::CachedAncestors,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaveInvalidation::CachedAncestors => "cached_ancestors",
            SaveInvalidation::ParentDir => "parent_dir",
        }
    }
}

/// Lazily-expanded project trees keyed by project root path.
pub struct TreeCache<F = OsFileSystem> {
    fs: F,
    roots: RwLock<BTreeMap<PathBuf, TreeNode>>,
    save_invalidation: SaveInvalidation,
}

impl TreeCache<OsFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Default for TreeCache<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> TreeCache<F> {
    /// Create an empty cache reading through `fs`.
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            roots: RwLock::new(BTreeMap::new()),
            save_invalidation: SaveInvalidation::default(),
        }
    }

    pub fn with_save_invalidation(mut self, policy: SaveInvalidation) -> Self {
        self.save_invalidation = policy;
        self
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn save_invalidation(&self) -> SaveInvalidation {
        self.save_invalidation
    }

    /// Return the cached tree for `project`, building its top level on a miss.
    ///
    /// Hits never touch the filesystem.
    pub fn get_project_tree(&self, project: &Path) -> Result<TreeNode> {
        if let Some(root) = self.roots.read().get(project) {
            debug!(project = %project.display(), "tree cache hit");
            return Ok(root.clone());
        }

        let mut roots = self.roots.write();
        // Another caller may have built it while we waited for the write lock.
        if let Some(root) = roots.get(project) {
            debug!(project = %project.display(), "tree cache hit after wait");
            return Ok(root.clone());
        }

        let mut root = build_top(&self.fs, project)?;
        root.sort_recursive();
        info!(
            project = %project.display(),
            children = root.children.len(),
            "built project tree"
        );
        roots.insert(project.to_path_buf(), root.clone());
        Ok(root)
    }

    /// Expand the directory at `dir` inside whichever cached tree holds it.
    ///
    /// Already-loaded directories are returned as they are, without a re-scan.
    pub fn load_directory(&self, dir: &Path) -> Result<TreeNode> {
        let mut roots = self.roots.write();
        let node = roots
            .values_mut()
            .find_map(|root| root.find_node_mut(dir))
            .filter(|node| node.is_dir())
            .ok_or_else(|| AppError::not_found("load_directory", dir))?;

        if node.is_loaded {
            debug!(dir = %dir.display(), "directory already loaded");
            return Ok(node.clone());
        }

        node.children = expand_one_level(&self.fs, dir)?;
        node.is_loaded = true;
        node.sort_children();
        debug!(dir = %dir.display(), children = node.children.len(), "expanded directory");
        Ok(node.clone())
    }

    /// Drop the entry for exactly `project`. Returns whether one existed.
    pub fn invalidate(&self, project: &Path) -> bool {
        let removed = self.roots.write().remove(project).is_some();
        if removed {
            info!(project = %project.display(), "invalidated project tree");
        }
        removed
    }

    /// Invalidate after `file` was written. Returns the keys removed.
    pub fn on_file_saved(&self, file: &Path) -> Vec<PathBuf> {
        let mut roots = self.roots.write();
        self.invalidate_for_save(&mut roots, file)
    }

    /// Write `contents` to `file`, then invalidate as [`Self::on_file_saved`].
    ///
    /// The write happens under the cache lock. Nothing is invalidated if it fails.
    pub fn save_file(&self, file: &Path, contents: &str) -> Result<Vec<PathBuf>> {
        let mut roots = self.roots.write();
        operations::write_file(&self.fs, file, contents)?;
        Ok(self.invalidate_for_save(&mut roots, file))
    }

    pub fn is_cached(&self, project: &Path) -> bool {
        self.roots.read().contains_key(project)
    }

    /// Cached project keys in order.
    pub fn cached_roots(&self) -> Vec<PathBuf> {
        self.roots.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.roots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    pub fn clear(&self) {
        self.roots.write().clear();
    }

    fn invalidate_for_save(
        &self,
        roots: &mut BTreeMap<PathBuf, TreeNode>,
        file: &Path,
    ) -> Vec<PathBuf> {
        let Some(parent) = file.parent() else {
            return Vec::new();
        };
        let keys: Vec<PathBuf> = match self.save_invalidation {
            SaveInvalidation::ParentDir => roots
                .contains_key(parent)
                .then(|| parent.to_path_buf())
                .into_iter()
                .collect(),
            SaveInvalidation::CachedAncestors => roots
                .keys()
                .filter(|key| parent.starts_with(key))
                .cloned()
                .collect(),
        };
        for key in &keys {
            roots.remove(key);
            info!(
                project = %key.display(),
                file = %file.display(),
                policy = self.save_invalidation.label(),
                "invalidated project tree after save"
            );
        }
        keys
    }
}
