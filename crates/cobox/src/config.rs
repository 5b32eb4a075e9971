//! CLI configuration: thin wrapper around `cobox_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (`--config`, `--api-base-url`, `--timeout`, `--output`).

use std::path::PathBuf;

use clap::ValueEnum;

use cobox_core::DashboardConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use cobox_config::{Config, config_path, session_store};

/// Config file in effect: `--config` / `COBOX_CONFIG`, else the platform path.
pub fn resolved_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the file + environment layers, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = cobox_config::load_config_from(&resolved_path(global))?;
    if let Some(ref url) = global.api_base_url {
        cfg.api_base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

pub fn dashboard_config(cfg: &Config) -> Result<DashboardConfig, CliError> {
    Ok(cobox_config::to_dashboard_config(cfg)?)
}

/// Output format: flag, then config `output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|_| CliError::Validation {
        field: "output".into(),
        reason: format!(
            "expected one of table, json, json-compact, yaml, plain; got '{}'",
            cfg.output
        ),
    })
}
