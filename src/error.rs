use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The path does not exist, or is not a directory known to any cached tree.
    #[error("{op}: not found: {}", path.display())]
    NotFound { op: &'static str, path: PathBuf },

    /// Any other stat/list/read/write failure.
    #[error("{op}: I/O error on {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// JSON output failure.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A global log subscriber was already installed.
    #[error("Logging setup error: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    /// A blocking task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Wrap an I/O error with the failing operation and path.
    ///
    /// `ErrorKind::NotFound` becomes [`AppError::NotFound`].
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            AppError::NotFound {
                op,
                path: path.to_path_buf(),
            }
        } else {
            AppError::Io {
                op,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn not_found(op: &'static str, path: &Path) -> Self {
        AppError::NotFound {
            op,
            path: path.to_path_buf(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = AppError::io("build_top", Path::new("/proj"), io_err);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "build_top: not found: /proj");
    }

    #[test]
    fn io_permission_denied_stays_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::io("expand_one_level", Path::new("/proj/sub"), io_err);
        assert!(matches!(err, AppError::Io { op: "expand_one_level", .. }));
        assert!(err.to_string().contains("/proj/sub"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn invalid_path_error_display() {
        let err = AppError::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
    }
}
