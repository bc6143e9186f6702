// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Optional `config.yaml` in the platform config directory. Every field has a
//! default, so a missing file or a partial file is fine.

use crate::db::APP;
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `mandi.sqlite`; the platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Hours between automatic snapshots.
    #[serde(default = "default_backup_interval_hours")]
    pub backup_interval_hours: u64,
    /// env_logger filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_backup_interval_hours() -> u64 {
    24
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            backup_interval_hours: default_backup_interval_hours(),
            log_level: default_log_level(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join("config.yaml"))
    }

    /// Reads `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backup_interval_hours == 0 {
            return Err(anyhow!("backup_interval_hours must be greater than 0"));
        }
        Ok(())
    }

    pub fn backup_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(self.backup_interval_hours as i64)
    }
}
