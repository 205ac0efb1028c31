//! Filesystem access seam used by the tree builder and file operations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// Metadata captured from a single stat of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub is_dir: bool,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl From<fs::Metadata> for EntryMeta {
    fn from(metadata: fs::Metadata) -> Self {
        Self {
            is_dir: metadata.is_dir(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }
}

/// One entry of a directory listing.
///
/// A listing yields every entry it could name; `meta` carries the per-entry
/// failure so callers can drop unreadable entries without failing the listing.
/// `name` is lossy and for display only; `path` is the real path.
#[derive(Debug)]
pub struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
    pub meta: io::Result<EntryMeta>,
}

/// The filesystem calls the explorer needs.
pub trait FileSystem: Send + Sync {
    /// Stat `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<EntryMeta>;

    /// List the immediate entries of `path`.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<ListedEntry>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or truncate `path` and write `contents`.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> io::Result<EntryMeta> {
        fs::metadata(path).map(EntryMeta::from)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut listed = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            listed.push(ListedEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                // DirEntry::metadata does not follow symlinks.
                meta: entry.metadata().map(EntryMeta::from),
            });
        }
        Ok(listed)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
