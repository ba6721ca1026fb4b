//! Operator overrides for a run, read from an optional RON file.
//!
//! Every field is optional in the file; missing ones keep their defaults, and
//! a missing file means "all defaults".

use std::fs;
use std::path::{Path, PathBuf};

use catalog_engine::{MarkerSettings, PipelineConfig, StoreSettings};
use catalog_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "catalog.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_url: String,
    pub elasticsearch_url: String,
    pub index: String,
    pub query: String,
    pub marker_dir: PathBuf,
    pub marker_name: String,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        let marker = MarkerSettings::default();
        Self {
            catalog_url: pipeline.catalog_url,
            elasticsearch_url: StoreSettings::default().base_url,
            index: pipeline.index,
            query: pipeline.query,
            marker_dir: marker.dir,
            marker_name: marker.name,
            log_target: LogTarget::Terminal,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            catalog_url: self.catalog_url.clone(),
            index: self.index.clone(),
            query: self.query.clone(),
            ..PipelineConfig::default()
        }
    }

    pub fn store(&self) -> StoreSettings {
        StoreSettings {
            base_url: self.elasticsearch_url.clone(),
            ..StoreSettings::default()
        }
    }

    pub fn marker(&self) -> MarkerSettings {
        MarkerSettings {
            dir: self.marker_dir.clone(),
            name: self.marker_name.clone(),
        }
    }
}
