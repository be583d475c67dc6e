use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default database file name inside `data_dir`.
pub const DEFAULT_DB_FILE: &str = "bakery.redb";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// What the report generator does when there are no customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReportPolicy {
    /// Answer with an explicit "cannot generate" result.
    #[default]
    Refuse,
    /// Answer with an empty worksheet and a zero total.
    EmptyWorksheet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub empty: EmptyReportPolicy,
}

/// Session configuration.
///
/// ```toml
/// data_dir = "/var/lib/bakery"
///
/// [report]
/// empty = "refuse"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/bakery.redb` if not specified.
    pub db_path: Option<PathBuf>,

    pub report: ReportConfig,
}

impl ServiceConfig {
    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve the redb database path, falling back to `{data_dir}/bakery.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join(DEFAULT_DB_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
        })
    }
}
