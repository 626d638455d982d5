//! Configuration, log and audit file locations

use crate::error::{CliError, CliResult};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "KC_CONFIG";

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_LOG_FILE: &str = "kc.log";
const DEFAULT_AUDIT_FILE: &str = "kc_audit.csv";

/// Files touched by a single invocation
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Path to config.json
    pub config_file: PathBuf,
    /// Mirrored execution log (appended)
    pub log_file: PathBuf,
    /// Audit record store (appended)
    pub audit_file: PathBuf,
}

impl ConfigPaths {
    /// Resolve paths from the global flags
    ///
    /// Config lookup order:
    /// - `--config <path>`
    /// - `KC_CONFIG` environment variable
    /// - `config.json` next to the executable
    /// - `config.json` in the working directory
    pub fn resolve(
        config: Option<&Path>,
        log_file: Option<&Path>,
        audit_file: Option<&Path>,
    ) -> CliResult<Self> {
        let config_file = match config {
            Some(p) => p.to_path_buf(),
            None => Self::find_config_file().ok_or_else(|| {
                CliError::Config(format!("{CONFIG_FILE_NAME} not found"))
            })?,
        };

        Ok(Self {
            config_file,
            log_file: log_file
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            audit_file: audit_file
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIT_FILE)),
        })
    }

    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(std::fs::canonicalize(&local).unwrap_or(local));
        }

        None
    }
}
