//! Configuration file support for careplan
//!
//! Loads optional settings from JSON.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.careplanrc.json` in the working directory
//! 3. `careplan.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for the simulated processing delay
pub const MAX_DISPLAY_DELAY_MS: u64 = 10_000;

/// Pause the web dashboard showed before revealing a recommendation
pub const DASHBOARD_DISPLAY_DELAY_MS: u64 = 1_500;

/// Rendering format for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// careplan configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CareplanConfig {
    /// Pin the confidence jitter stream (default: fresh entropy per run)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Simulated processing delay before a recommendation is shown, in ms (default: 0)
    #[serde(default)]
    pub display_delay_ms: Option<u64>,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub seed: Option<u64>,
    pub display_delay_ms: u64,
    pub format: OutputFormat,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl CareplanConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.display_delay_ms {
            if delay > MAX_DISPLAY_DELAY_MS {
                anyhow::bail!(
                    "display_delay_ms must be at most {} (got {})",
                    MAX_DISPLAY_DELAY_MS,
                    delay
                );
            }
        }
        Ok(())
    }

    /// Apply defaults
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;
        Ok(ResolvedConfig {
            seed: self.seed,
            display_delay_ms: self.display_delay_ms.unwrap_or(0),
            format: self.format.unwrap_or_default(),
            config_path: None,
        })
    }

    /// Resolved configuration with all defaults (no config file)
    pub fn defaults() -> Result<ResolvedConfig> {
        CareplanConfig::default().resolve()
    }
}

/// Discover and load a config file from `root`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(CareplanConfig, PathBuf)>> {
    for name in [".careplanrc.json", "careplan.config.json"] {
        let path = root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<CareplanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: CareplanConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `root`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (CareplanConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    tracing::debug!(?resolved, "configuration resolved");
    Ok(resolved)
}
