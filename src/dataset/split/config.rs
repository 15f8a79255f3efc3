use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the application directory when no `--config` is passed.
pub const SPLIT_CONFIG_FILE_NAME: &str = "split.toml";

/// Splitter defaults read from TOML. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfigToml {
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub ratio: Option<Vec<f64>>,
    #[serde(rename = "move")]
    pub move_folders: Option<bool>,
}

/// Errors raised while loading a splitter config file.
#[derive(Debug, Error)]
pub enum SplitConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid splitter TOML.
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Path of `split.toml` inside the application directory.
pub fn split_config_path() -> Option<PathBuf> {
    let dir = crate::app_dirs::app_root_dir().ok()?;
    Some(dir.join(SPLIT_CONFIG_FILE_NAME))
}

pub fn load_split_config(path: &Path) -> Result<SplitConfigToml, SplitConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| SplitConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| SplitConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `split.toml` from the application directory if it exists.
pub fn load_split_config_from_app_dir() -> Result<Option<SplitConfigToml>, SplitConfigError> {
    match split_config_path() {
        Some(path) if path.is_file() => load_split_config(&path).map(Some),
        _ => Ok(None),
    }
}
