//! Run configuration: TOML files and built-in presets.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use scrub_model::ScrubConfig;

/// Built-in configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Customer call-list export cleanup.
    CustomerCallList,
}

impl Preset {
    pub fn config(self) -> ScrubConfig {
        match self {
            Self::CustomerCallList => ScrubConfig::customer_call_list(),
        }
    }
}

/// Parses a TOML configuration file.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a valid configuration.
pub fn read_config(path: &Path) -> Result<ScrubConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

/// File first, then preset, then an empty configuration.
///
/// # Errors
///
/// See [`read_config`].
pub fn load_config(path: Option<&Path>, preset: Option<Preset>) -> Result<ScrubConfig> {
    match (path, preset) {
        (Some(path), _) => read_config(path),
        (None, Some(preset)) => Ok(preset.config()),
        (None, None) => Ok(ScrubConfig::default()),
    }
}

/// Renders a configuration as TOML, the format [`read_config`] accepts.
///
/// # Errors
///
/// Fails when the configuration cannot be represented in TOML.
pub fn render_config(config: &ScrubConfig) -> Result<String> {
    toml::to_string_pretty(config).context("serialize config")
}
