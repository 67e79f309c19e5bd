use std::path::Path;

use anyhow::{Context, Result};
use deshake_core::params::{ParameterOverrides, ProcessingParameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Contents of a `--config` TOML file.
///
/// ```toml
/// framerate = 29.97
///
/// [params]
/// pure_black_width = 10
/// line_start_smoothing_kernel_size = 31
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub framerate: Option<f64>,
    pub params: ParameterOverrides,
}

/// Fully resolved settings, printed by `--print-config` in a form
/// [`ConfigFile`] reads back.
#[derive(Debug, Serialize)]
pub struct ResolvedConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framerate: Option<f64>,
    pub params: &'a ProcessingParameters,
}

pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("Invalid deshaker config")
}

pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("In config file {}", path.display()))?;
    debug!(path = %path.display(), ?config, "Loaded config file");
    Ok(config)
}
