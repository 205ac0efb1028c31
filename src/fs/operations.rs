use std::path::Path;

use crate::error::{AppError, Result};
use crate::fs::source::FileSystem;

/// Read the whole file at `path` as UTF-8 text.
pub fn read_file(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    fs.read_to_string(path)
        .map_err(|e| AppError::io("read_file", path, e))
}

/// Create or truncate the file at `path` and write `contents`.
pub fn write_file(fs: &dyn FileSystem, path: &Path, contents: &str) -> Result<()> {
    fs.write(path, contents)
        .map_err(|e| AppError::io("write_file", path, e))
}
