//! Dashboard configuration, read from TOML.
//!
//! Lookup order: an explicit `--config` file (errors are fatal), then
//! `<data_dir>/rocket-race.toml` (errors fall back to defaults with a
//! warning), then built-in defaults. Relative paths inside a config file are
//! resolved against the file's directory for `data_dir`, and against
//! `data_dir` for everything else.

use std::fs;
use std::path::{Path, PathBuf};

use race_ingest::{
    DEFAULT_BACKUP_PREFIX, DEFAULT_IMAGE_MAPPING_FILE, DEFAULT_LIVE_RESULTS_FILE,
    DEFAULT_PARTICIPANT_LIST_PREFIX, SourceConfig,
};
use race_model::{Diagnostic, Diagnostics};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the config file looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "rocket-race.toml";

/// Rows shown by the leaderboard when no limit is given.
pub const DEFAULT_LEADERBOARD_TOP: usize = 25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings of one dashboard instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the race files.
    pub data_dir: PathBuf,
    pub live_results_file: PathBuf,
    /// Name prefix of backup result files.
    pub backup_prefix: String,
    /// Explicit participant list; discovered by prefix when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_list: Option<PathBuf>,
    pub participant_list_prefix: String,
    pub image_mapping_file: PathBuf,
    /// Default leaderboard length.
    pub leaderboard_top: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            live_results_file: PathBuf::from(DEFAULT_LIVE_RESULTS_FILE),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
            participant_list: None,
            participant_list_prefix: DEFAULT_PARTICIPANT_LIST_PREFIX.to_string(),
            image_mapping_file: PathBuf::from(DEFAULT_IMAGE_MAPPING_FILE),
            leaderboard_top: DEFAULT_LEADERBOARD_TOP,
        }
    }
}

impl DashboardConfig {
    /// Defaults rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads a config file.
    ///
    /// A relative `data_dir` is taken relative to the file's directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.data_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.data_dir = parent.join(&config.data_dir);
        }
        Ok(config)
    }

    /// Picks the configuration for a run.
    ///
    /// `data_dir` overrides whatever directory the file names.
    ///
    /// # Errors
    ///
    /// Only an unreadable or invalid explicit config file is an error.
    pub fn resolve(
        explicit: Option<&Path>,
        data_dir: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => Self::discover(data_dir.unwrap_or(Path::new(".")), diagnostics),
        };
        if let Some(dir) = data_dir {
            config.data_dir = dir.to_path_buf();
        }
        tracing::debug!(data_dir = %config.data_dir.display(), "Resolved dashboard config");
        Ok(config)
    }

    /// Looks for [`CONFIG_FILE_NAME`] in `data_dir`, degrading to defaults.
    pub fn discover(data_dir: &Path, diagnostics: &mut Diagnostics) -> Self {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Self::new(data_dir);
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(error) => {
                diagnostics.push(
                    Diagnostic::warning(format!("{error}; using default settings"))
                        .with_path(&path),
                );
                Self::new(data_dir)
            }
        }
    }

    /// Joins a relative path onto `data_dir`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Tier locations for the source resolver.
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            data_dir: self.data_dir.clone(),
            live_results_file: self.live_results_file.clone(),
            backup_prefix: self.backup_prefix.clone(),
            participant_list: self.participant_list.clone(),
            participant_list_prefix: self.participant_list_prefix.clone(),
        }
    }

    pub fn image_mapping_path(&self) -> PathBuf {
        self.resolve_path(&self.image_mapping_file)
    }
}
