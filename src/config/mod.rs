//! Layered configuration for filesift
//!
//! Sources, lowest priority first:
//!
//! 1. embedded `default-config.toml`
//! 2. `filesift.toml` / `.json` / `.yaml` / `.yml` in the working directory,
//!    or the single file passed with `--config` (format from its extension)
//! 3. `FILESIFT_*` environment variables
//! 4. command-line flags ([`ScanOverrides`])

use crate::scan::{FilterKind, ScanConfig};
use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::Serialize;
use std::path::Path;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "FILESIFT_";

/// Merged configuration sources
pub struct FilesiftConfig {
    figment: Figment,
}

/// Values given on the command line; `None` leaves lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_filenames: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FilesiftConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                bail!("Config file not found: {}", custom_path.display());
            }
            let extension = custom_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            figment = figment
                .merge(Toml::file("filesift.toml"))
                .merge(Json::file("filesift.json"))
                .merge(Yaml::file("filesift.yaml"))
                .merge(Yaml::file("filesift.yml"));
        }

        // Environment variables override every file
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Ok(FilesiftConfig { figment })
    }

    /// Layer command-line values on top of everything else
    pub fn with_overrides(self, overrides: &ScanOverrides) -> Self {
        Self {
            figment: self.figment.merge(Serialized::defaults(overrides)),
        }
    }

    pub fn scan_config(&self) -> Result<ScanConfig> {
        self.figment
            .extract()
            .context("Invalid filesift configuration")
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        let config = self.scan_config()?;
        Ok(serde_json::to_value(config)?)
    }
}
