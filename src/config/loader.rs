use crate::config::schema::Config;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "treesort.toml";

/// Candidate config files, highest priority first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("treesort").join("config.toml"));
    }
    paths
}

/// Load the first config file found, or built-in defaults if there is none.
pub fn load_config() -> ConfigResult<Config> {
    for path in config_search_paths() {
        if path.is_file() {
            return load_config_file(&path);
        }
    }
    debug!("no config file found, using defaults");
    Ok(Config::default())
}

pub fn load_config_file(path: &Path) -> ConfigResult<Config> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}
