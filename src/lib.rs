//! Lazy-loading, cache-backed project file tree for editor explorer panels.
//!
//! [`app::App`] is the surface a UI calls into; [`fs::cache::TreeCache`] holds
//! one partially materialized [`fs::tree::TreeNode`] tree per open project.

pub mod app;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod ui;

pub use app::App;
pub use error::{AppError, Result};
pub use fs::cache::{SaveInvalidation, TreeCache};
pub use fs::tree::{NodeType, TreeNode};
