//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer and overridden by
//! environment variables and command-line flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TeamfinderError;

/// Default HTTP request timeout for the hosted backend.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which gateway implementation backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted Postgres + auth REST API.
    Supabase,
    /// In-process tables seeded with a demo catalog.
    #[default]
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Supabase => f.write_str("supabase"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = TeamfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(TeamfinderError::config(format!(
                "Unknown backend '{}' (expected 'supabase' or 'memory')",
                other
            ))),
        }
    }
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Public anonymous API key.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SupabaseConfig {
    /// Checks that the connection settings are usable.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.url.trim().is_empty() {
            return Err(TeamfinderError::config("supabase.url is not set"));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(TeamfinderError::config(format!(
                "supabase.url must start with http:// or https:// (got '{}')",
                self.url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(TeamfinderError::config("supabase.anon_key is not set"));
        }
        Ok(())
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}
