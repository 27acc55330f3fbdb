// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration: TOML file overlaid by environment variables.
//!
//! ```toml
//! api_url = "https://helpdesk.example.com/api/v1"
//! token = "..."
//! timeout_ms = 10000
//! ```

use crate::env;
use hd_adapters::{HttpConfig, RepositoryError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk shape. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Config {
    /// Load from `$HD_CONFIG` (must exist) or the default location (may be absent),
    /// then apply `HD_API_URL`, `HD_TOKEN` and `HD_TIMEOUT_MS`.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::config_path() {
            Some(path) => read_file(&path)?,
            None => match default_path() {
                Some(path) if path.exists() => read_file(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::resolve(file))
    }

    /// Overlay environment variables on `file`.
    pub fn resolve(file: FileConfig) -> Self {
        let api_url = env::api_url()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = env::token().or(file.token);
        let timeout = env::timeout_ms()
            .or(file.timeout_ms.map(Duration::from_millis))
            .unwrap_or(DEFAULT_TIMEOUT);
        Self {
            api_url,
            token,
            timeout,
        }
    }

    /// Request timeout in whole milliseconds, saturating at `u64::MAX`.
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn http_config(&self) -> Result<HttpConfig, RepositoryError> {
        let config = HttpConfig::new(&self.api_url)?.with_timeout(self.timeout);
        Ok(match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        })
    }
}

/// `<config_dir>/helpdesk/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("helpdesk").join("config.toml"))
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
