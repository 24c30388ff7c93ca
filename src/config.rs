//! TOML configuration for the `uctx` binary.
//!
//! ```toml
//! [render]
//! format = "markdown"        # or "json"
//! max_content_chars = 4000
//!
//! [log]
//! filter = "info"            # RUST_LOG overrides this
//! ```
//!
//! Every section and key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use unified_context_core::render::{RenderOptions, DEFAULT_MAX_CONTENT_CHARS};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Output shape of a rendered context.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenderConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            max_content_chars: self.max_content_chars,
        }
    }
}

fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.render.max_content_chars == 0 {
        anyhow::bail!("render.max_content_chars must be > 0");
    }

    if config.log.filter.trim().is_empty() {
        anyhow::bail!("log.filter must not be empty");
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Load `path` if it exists; otherwise fall back to defaults when
/// `allow_missing` is set.
pub fn load_or_default(path: &Path, allow_missing: bool) -> Result<Config> {
    if allow_missing && !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}
