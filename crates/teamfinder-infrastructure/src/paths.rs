//! Path management for TeamFinder's local files.
//!
//! ```text
//! ~/.config/teamfinder/        # Config directory
//! ├── config.toml              # Backend selection and connection settings
//! ├── history.txt              # Shell history
//! └── logs/                    # Application logs
//!     └── teamfinder.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "teamfinder";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves TeamFinder paths, optionally under a custom base directory (for testing).
#[derive(Debug, Clone, Default)]
pub struct TeamfinderPaths {
    base_dir: Option<PathBuf>,
}

impl TeamfinderPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the TeamFinder configuration directory.
    ///
    /// - `Ok(PathBuf)`: `<base>` when set, otherwise e.g. `~/.config/teamfinder/`
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("history.txt"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base_dir() {
        let paths = TeamfinderPaths::new(Some(PathBuf::from("/tmp/tf")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/tf/config.toml"));
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/tf/logs"));
        assert_eq!(paths.history_file().unwrap(), PathBuf::from("/tmp/tf/history.txt"));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_dir() {
        if let Ok(dir) = TeamfinderPaths::default().config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
