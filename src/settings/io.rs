use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::{ConfigError, DashboardSettings};

/// Settings filename inside the app root.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the settings file path, ensuring the app root exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the app root, returning defaults when the file is missing.
pub fn load_or_default() -> Result<DashboardSettings, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load settings from `path`, returning defaults when it does not exist.
pub fn load_from_path(path: &Path) -> Result<DashboardSettings, ConfigError> {
    if !path.exists() {
        return Ok(DashboardSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist settings to the app root.
pub fn save(settings: &DashboardSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Persist settings to `path`, creating parent directories as needed.
pub fn save_to_path(settings: &DashboardSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
