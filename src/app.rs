use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::Result;
use crate::fs::cache::TreeCache;
use crate::fs::operations;
use crate::fs::source::{FileSystem, OsFileSystem};
use crate::fs::tree::TreeNode;

/// The explorer surface the UI layer calls into.
///
/// Every incoming path is canonicalized first so cache keys and node paths
/// agree no matter how the caller spelled the path. Paths that cannot be
/// canonicalized (for example because they do not exist) are used as given.
pub struct App<F = OsFileSystem> {
    cache: TreeCache<F>,
}

impl App<OsFileSystem> {
    /// Create an App on the host filesystem using `config`'s cache settings.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_cache(TreeCache::new().with_save_invalidation(config.save_invalidation()))
    }
}

impl<F: FileSystem> App<F> {
    pub fn with_cache(cache: TreeCache<F>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TreeCache<F> {
        &self.cache
    }

    /// Top level of the project tree rooted at `project`.
    pub fn get_project_files(&self, project: &Path) -> Result<TreeNode> {
        self.cache.get_project_tree(&normalize(project))
    }

    /// Expand a directory already present in a cached project tree.
    pub fn load_directory_contents(&self, dir: &Path) -> Result<TreeNode> {
        self.cache.load_directory(&normalize(dir))
    }

    pub fn get_file_content(&self, path: &Path) -> Result<String> {
        operations::read_file(self.cache.fs(), &normalize(path))
    }

    /// Write `content` to `path` and drop the affected cached trees.
    ///
    /// Returns the project keys that were invalidated.
    pub fn save_file(&self, path: &Path, content: &str) -> Result<Vec<PathBuf>> {
        self.cache.save_file(&normalize_file(path), content)
    }

    pub fn invalidate_cache(&self, project: &Path) -> bool {
        self.cache.invalidate(&normalize(project))
    }
}

/// Group directories to expand into waves, shallowest first.
///
/// A directory only becomes expandable once its parent is loaded, so each
/// wave may run concurrently but the waves must run in order.
pub fn expansion_waves(paths: &[PathBuf]) -> Vec<Vec<PathBuf>> {
    let mut ordered: Vec<&PathBuf> = paths.iter().collect();
    ordered.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });
    ordered.dedup();

    let mut waves: Vec<Vec<PathBuf>> = Vec::new();
    let mut depth = None;
    for path in ordered {
        let d = path.components().count();
        if depth != Some(d) {
            waves.push(Vec::new());
            depth = Some(d);
        }
        if let Some(wave) = waves.last_mut() {
            wave.push(path.clone());
        }
    }
    waves
}

/// Canonicalize `path`, or return it unchanged when that fails.
pub fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Like [`normalize`], but resolves through the parent for files that do not
/// exist yet.
fn normalize_file(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            normalize(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}
