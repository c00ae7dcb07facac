use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::FileConfig;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".vectorlint-action.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty YAML document is a valid, empty config.
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load [`DEFAULT_CONFIG_FILE`] from `dir` if it exists.
pub fn load_from_dir(dir: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load(&path).map(Some)
}
