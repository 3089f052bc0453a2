//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and applies environment
//! overrides. A missing file yields the defaults (memory backend).
//!
//! Priority: environment variables > config.toml > defaults

use std::path::{Path, PathBuf};

use teamfinder_core::config::{BackendKind, RootConfig};
use teamfinder_core::error::{Result, TeamfinderError};

use crate::paths::TeamfinderPaths;

pub const ENV_BACKEND: &str = "TEAMFINDER_BACKEND";
pub const ENV_SUPABASE_URL: &str = "TEAMFINDER_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "TEAMFINDER_SUPABASE_ANON_KEY";

/// Loads and resolves the TeamFinder configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the given file, or the default `config.toml` location.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => TeamfinderPaths::default()
                .config_file()
                .map_err(|e| TeamfinderError::config(e.to_string()))?,
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (if present) and applies process environment overrides.
    pub fn load(&self) -> Result<RootConfig> {
        let config = self.load_file()?;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Reads only the file; a missing file yields the defaults.
    pub fn load_file(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "Config file not found, using defaults");
            return Ok(RootConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let config: RootConfig = toml::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), backend = %config.backend, "Loaded config");
        Ok(config)
    }

    /// Writes `config` to the file, creating parent directories.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Applies `TEAMFINDER_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: RootConfig, lookup: F) -> Result<RootConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(backend) = lookup(ENV_BACKEND) {
        config.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(url) = lookup(ENV_SUPABASE_URL) {
        config.supabase.url = url;
    }
    if let Some(anon_key) = lookup(ENV_SUPABASE_ANON_KEY) {
        config.supabase.anon_key = anon_key;
    }
    Ok(config)
}
