//! TOML configuration file.
//!
//! ```toml
//! [normalize]
//! aggregate_marker = "Overall Result"
//! date_formats = ["%m/%d/%Y %H:%M:%S", "%Y-%m-%d"]
//! synthetic_label_suffix = " Key"
//! ```
//!
//! Every table and key is optional; absent values keep their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use formbind_normalize::NormalizeOptions;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub normalize: NormalizeOptions,
}

impl AppConfig {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("parse configuration")
    }
}

/// Loads the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read configuration {}", path.display()))?;
    let config = AppConfig::from_toml(&contents)
        .with_context(|| format!("load configuration {}", path.display()))?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}
