//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--log-level`)
//! 2. `$PROJECT_EXPLORER_CONFIG` environment variable (path to config file)
//! 3. Project-local `.project-explorer.toml` in the current working directory
//! 4. Global `~/.config/project-explorer/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::fs::cache::SaveInvalidation;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Project root used when none is given on the command line.
    pub default_path: Option<String>,
}

/// Tree cache settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Which cached projects a save drops: "cached_ancestors" or "parent_dir".
    pub save_invalidation: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "info" or "project_explorer=debug".
    pub level: Option<String>,
    /// Output format: "text" or "json".
    pub format: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default log filter when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PROJECT_EXPLORER_CONFIG";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".project-explorer.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("project-explorer").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
            },
            cache: CacheConfig {
                save_invalidation: other
                    .cache
                    .save_invalidation
                    .clone()
                    .or(self.cache.save_invalidation),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                format: other.log.format.clone().or(self.log.format),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher-priority files overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Project root used when none is given.
    pub fn default_path(&self) -> &str {
        self.general.default_path.as_deref().unwrap_or(".")
    }

    pub fn save_invalidation(&self) -> SaveInvalidation {
        self.cache
            .save_invalidation
            .as_deref()
            .map(SaveInvalidation::from_str)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Whether logs are emitted as JSON lines.
    pub fn log_json(&self) -> bool {
        self.log.format.as_deref() == Some("json")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.default_path(), ".");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::CachedAncestors);
        assert_eq!(cfg.log_level(), "warn");
        assert!(!cfg.log_json());
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
default_path = "/home/dev/project"

[cache]
save_invalidation = "parent_dir"

[log]
level = "project_explorer=debug"
format = "json"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.default_path(), "/home/dev/project");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::ParentDir);
        assert_eq!(cfg.log_level(), "project_explorer=debug");
        assert!(cfg.log_json());
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[cache]
save_invalidation = "parent_dir"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::ParentDir);
        assert_eq!(cfg.default_path(), ".");
        assert_eq!(cfg.log_level(), "warn");
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::CachedAncestors);
    }

    #[test]
    fn test_unknown_policy_falls_back_to_default() {
        let cfg: AppConfig =
            toml::from_str("[cache]\nsave_invalidation = \"sometimes\"\n").expect("parse");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::CachedAncestors);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                default_path: Some("/base".into()),
            },
            log: LogConfig {
                level: Some("info".into()),
                format: Some("json".into()),
            },
            ..Default::default()
        };

        let over = AppConfig {
            log: LogConfig {
                level: Some("debug".into()),
                // format not set — should keep base
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.log_level(), "debug"); // overridden
        assert!(merged.log_json()); // from base
        assert_eq!(merged.default_path(), "/base"); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            cache: CacheConfig {
                save_invalidation: Some("parent_dir".into()),
            },
            ..Default::default()
        };

        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.save_invalidation(), SaveInvalidation::ParentDir);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
default_path = "/srv/repo"

[log]
level = "info"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.default_path(), "/srv/repo");
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::CachedAncestors);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[cache]
save_invalidation = "parent_dir"

[log]
level = "info"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            log: LogConfig {
                level: Some("trace".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        // CLI override wins
        assert_eq!(cfg.log_level(), "trace");
        // File value preserved
        assert_eq!(cfg.save_invalidation(), SaveInvalidation::ParentDir);
    }
}
