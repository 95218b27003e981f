// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration persistence for mysqlbackup-lister
//!
//! All data is stored under ~/.mysqlbackup-lister/:
//! - ~/.mysqlbackup-lister/config.json - user configuration
//! - ~/.mysqlbackup-lister/log/ - rolling log files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long to wait for the initial cache sync unless configured otherwise
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 30;

fn default_sync_timeout_secs() -> u64 {
    DEFAULT_SYNC_TIMEOUT_SECS
}

/// Get the base directory (~/.mysqlbackup-lister/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".mysqlbackup-lister"))
        .context("Could not determine home directory")
}

/// mysqlbackup-lister configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Kubeconfig context to use when --context is not given
    #[serde(default)]
    pub context: Option<String>,

    /// Namespace to use when --namespace is not given
    #[serde(default)]
    pub namespace: Option<String>,

    /// Seconds to wait for the informer's first list
    #[serde(default = "default_sync_timeout_secs")]
    pub sync_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: None,
            namespace: None,
            sync_timeout_secs: DEFAULT_SYNC_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.mysqlbackup-lister/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs)
    }

    /// Namespace to query: explicit flag, then config, then "default"
    pub fn resolve_namespace(&self, flag: Option<&str>) -> String {
        flag.or(self.namespace.as_deref())
            .unwrap_or("default")
            .to_string()
    }

    /// Context to use: explicit flag, then config, then kubeconfig's current context
    pub fn resolve_context(&self, flag: Option<&str>) -> Option<String> {
        flag.or(self.context.as_deref()).map(String::from)
    }
}
