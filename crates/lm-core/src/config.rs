//! Configuration types and parsing for loam.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main project configuration from loam.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory containing per-table SQL dump files
    #[serde(default = "default_dump_dir")]
    pub dump_dir: String,

    /// Destination database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// User id that ownerless CSR applications attach to.
    ///
    /// The legacy tool hardcoded this to the site administrator; here it is
    /// an explicit configured value so the account is never assumed.
    #[serde(default = "default_fallback_user_id")]
    pub fallback_user_id: i64,

    /// Advisory per-table row-count floors. A stage whose source parses
    /// fewer rows than its floor logs a warning but still runs.
    #[serde(default)]
    pub min_expected_rows: HashMap<String, usize>,
}

/// Destination database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB database file (":memory:" for in-memory)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            dump_dir: default_dump_dir(),
            database: DatabaseConfig::default(),
            fallback_user_id: default_fallback_user_id(),
            min_expected_rows: HashMap::new(),
        }
    }
}

fn default_name() -> String {
    "nmda-migration".to_string()
}

fn default_dump_dir() -> String {
    "dumps".to_string()
}

fn default_db_path() -> String {
    "target/migrate.duckdb".to_string()
}

fn default_fallback_user_id() -> i64 {
    1
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `loam.yml` from the project directory, falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default(project_dir: &Path) -> CoreResult<Self> {
        let path = project_dir.join("loam.yml");
        if path.exists() {
            Self::from_file(&path)
        } else {
            log::debug!("No loam.yml in {}, using defaults", project_dir.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    fn validate(&self) -> CoreResult<()> {
        if self.fallback_user_id <= 0 {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "fallback_user_id must be positive, got {}",
                    self.fallback_user_id
                ),
            });
        }
        Ok(())
    }

    /// Absolute dump directory, resolved against the project root
    pub fn dump_dir_absolute(&self, root: &Path) -> PathBuf {
        let p = Path::new(&self.dump_dir);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root.join(p)
        }
    }

    /// Advisory row-count floor for a legacy table, if configured
    pub fn min_rows_for(&self, table: &str) -> Option<usize> {
        self.min_expected_rows.get(table).copied()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
