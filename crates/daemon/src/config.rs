// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: TOML file plus environment overrides

use std::path::{Path, PathBuf};

use sel_engine::MonitorConfig;
use sel_storage::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overrides every state path (log files, erase marker, daemon log, socket)
pub const STATE_DIR_ENV: &str = "SEL_STATE_DIR";
/// Overrides the socket path
pub const SOCKET_PATH_ENV: &str = "SEL_SOCKET_PATH";

pub const DEFAULT_SOCKET_PATH: &str = "/run/sel/seld.sock";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where records go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Local log files plus a structured journal entry
    Journal {
        /// Unit reloaded after a clear so it reopens its files
        #[serde(default)]
        reload_unit: Option<String>,
    },
    /// Forward to a logging service; nothing is stored locally
    LoggingService { url: String },
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Journal { reload_unit: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_dir: PathBuf,
    pub log_prefix: String,
    pub erase_marker: PathBuf,
    /// Rotate the active file once it reaches this size; 0 disables rotation
    pub max_file_bytes: u64,
    /// Files kept when rotating, including the active one
    pub max_files: usize,
    pub socket_path: PathBuf,
    pub daemon_log: PathBuf,
    pub sink: SinkConfig,
    pub monitors: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("/var/log"),
            log_prefix: "ipmi_sel".to_string(),
            erase_marker: PathBuf::from("/var/lib/ipmi/sel_erase_time"),
            max_file_bytes: 0,
            max_files: 4,
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            daemon_log: PathBuf::from("/var/log/seld.log"),
            sink: SinkConfig::default(),
            monitors: MonitorConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path` (defaults when absent) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var_os(STATE_DIR_ENV).map(PathBuf::from),
            std::env::var_os(SOCKET_PATH_ENV).map(PathBuf::from),
        );
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Relocate state under `state_dir` and/or move the socket
    pub fn apply_overrides(&mut self, state_dir: Option<PathBuf>, socket_path: Option<PathBuf>) {
        if let Some(dir) = state_dir {
            self.log_dir = dir.join("log");
            self.erase_marker = dir.join("sel_erase_time");
            self.daemon_log = dir.join("seld.log");
            self.socket_path = dir.join("seld.sock");
        }
        if let Some(socket) = socket_path {
            self.socket_path = socket;
        }
    }

    /// Exclusive lock held while the daemon runs
    pub fn lock_path(&self) -> PathBuf {
        self.socket_path.with_extension("pid")
    }

    pub fn store_config(&self) -> StoreConfig {
        let mut store = StoreConfig::new(&self.log_dir, &self.erase_marker);
        store.prefix = self.log_prefix.clone();
        store.max_file_bytes = self.max_file_bytes;
        store.max_files = self.max_files;
        store
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
