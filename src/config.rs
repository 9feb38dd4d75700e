use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MEASUREMENTS_FILE: &str = "sample_measurements.xlsx";
pub const DEFAULT_TRENDLINES_FILE: &str = "sample_trendlines.xlsx";
pub const DEFAULT_INDEX_COLUMN: &str = "time";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for the selection/export tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Loaded when no file is uploaded.
    pub default_source: PathBuf,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_source: PathBuf::from(DEFAULT_MEASUREMENTS_FILE),
        }
    }
}

/// Settings for the historical-ranges tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangesConfig {
    pub default_source: PathBuf,
    /// Shared X column every measurement is plotted against.
    pub index_column: String,
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            default_source: PathBuf::from(DEFAULT_TRENDLINES_FILE),
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub selection: SelectionConfig,
    pub ranges: RangesConfig,
}

impl AppConfig {
    /// Read a JSON config file; keys it leaves out keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Built-in defaults unless a config path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"ranges": {"index_column": "hours"}}"#).unwrap();
        assert_eq!(cfg.ranges.index_column, "hours");
        assert_eq!(cfg.ranges.default_source, PathBuf::from(DEFAULT_TRENDLINES_FILE));
        assert_eq!(cfg.selection, SelectionConfig::default());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::from_path(&path), Err(ConfigError::Parse { .. })));
    }
}
