//! Location of xrayscope's own files.
//!
//! Everything lives in one `.xrayscope` folder under the OS config directory,
//! or under `XRAYSCOPE_CONFIG_HOME` when that is set (portable installs, CI).

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory that lives under the config root.
pub const APP_DIR_NAME: &str = ".xrayscope";
/// Environment variable that replaces the OS config root.
pub const CONFIG_HOME_ENV: &str = "XRAYSCOPE_CONFIG_HOME";
const LOGS_DIR_NAME: &str = "logs";

#[cfg(test)]
static BASE_OVERRIDE: std::sync::Mutex<Option<PathBuf>> = std::sync::Mutex::new(None);

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory available; set XRAYSCOPE_CONFIG_HOME")]
    NoBaseDir,
    #[error("Failed to create application directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Path of `name` inside the `.xrayscope` folder, creating the folder if needed.
///
/// The file itself is not touched; `config.toml` for example may not exist.
pub fn app_file(name: &str) -> Result<PathBuf, AppDirError> {
    Ok(ensure_dir(root_path()?)?.join(name))
}

/// Per-launch log files go here.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(root_path()?.join(LOGS_DIR_NAME))
}

fn root_path() -> Result<PathBuf, AppDirError> {
    base_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(AppDirError::NoBaseDir)
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn base_dir() -> Option<PathBuf> {
    #[cfg(test)]
    {
        if let Some(path) = BASE_OVERRIDE.lock().ok().and_then(|guard| guard.clone()) {
            return Some(path);
        }
    }
    std::env::var_os(CONFIG_HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
}

#[cfg(test)]
pub(crate) fn set_base_override(path: Option<PathBuf>) {
    let mut guard = BASE_OVERRIDE.lock().unwrap_or_else(|err| err.into_inner());
    *guard = path;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::OverrideGuard;
    use tempfile::tempdir;

    #[test]
    fn app_file_creates_folder_but_not_file() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let path = app_file("config.toml").unwrap();
        assert_eq!(path, base.path().join(APP_DIR_NAME).join("config.toml"));
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn logs_dir_lives_under_app_folder() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let logs = logs_dir().unwrap();
        assert_eq!(logs, base.path().join(APP_DIR_NAME).join(LOGS_DIR_NAME));
        assert!(logs.is_dir());
    }

    #[test]
    fn unwritable_base_reports_create_error() {
        let base = tempdir().unwrap();
        let blocker = base.path().join("occupied");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let _guard = OverrideGuard::set(blocker);
        assert!(matches!(
            app_file("config.toml"),
            Err(AppDirError::CreateDir { .. })
        ));
    }
}
