//! Where opsboard keeps its config file and launch logs.
//!
//! Everything lives in one `.opsboard` folder under the OS config directory.
//! Setting `OPSBOARD_CONFIG_HOME` moves that folder, which the integration
//! tests use to stay out of the real profile.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created under the config base.
pub const APP_DIR_NAME: &str = ".opsboard";
/// Environment variable that replaces the config base directory.
pub const CONFIG_HOME_ENV: &str = "OPSBOARD_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directories opsboard writes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppDir {
    Root,
    Logs,
}

impl AppDir {
    fn under(self, base: &Path) -> PathBuf {
        let root = base.join(APP_DIR_NAME);
        match self {
            AppDir::Root => root,
            AppDir::Logs => root.join(LOGS_DIR_NAME),
        }
    }

    /// Resolve against the current environment and create the directory.
    pub fn ensure(self) -> Result<PathBuf, AppDirError> {
        let base = resolve_base(std::env::var_os(CONFIG_HOME_ENV)).ok_or(AppDirError::NoBaseDir)?;
        let path = self.under(&base);
        std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// The `.opsboard` root, created on demand.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    AppDir::Root.ensure()
}

/// Launch logs directory, created on demand.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    AppDir::Logs.ensure()
}

fn resolve_base(override_home: Option<OsString>) -> Option<PathBuf> {
    match override_home {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    }
}
