//! `uctx replay` and `uctx check`.
//!
//! Replays a session script against a fresh store and renders the result in
//! the configured output format.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use unified_context_core::models::ContextCategory;
use unified_context_core::render::{render_json, render_markdown};

use crate::config::{Config, OutputFormat};
use crate::script::{parse_script, Session, SessionOp};

/// Inputs for one replay, beyond the config file.
#[derive(Debug, Default, Clone)]
pub struct ReplayOptions {
    /// Overrides `render.format`.
    pub format: Option<OutputFormat>,
    /// Print only this category's items instead of the unified view.
    pub category: Option<ContextCategory>,
}

fn read_script(path: &Path) -> Result<Vec<SessionOp>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session script: {}", path.display()))?;
    parse_script(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Replay `script` and return the rendered output.
pub fn run_replay(config: &Config, script: &Path, opts: &ReplayOptions) -> Result<String> {
    let ops = read_script(script)?;

    let session = Session::new();
    session.store().subscribe(|items| {
        debug!(items = items.len(), "context updated");
    });
    session.replay(&ops);

    let items = match opts.category {
        Some(category) => session.store().get_items_by_type(category),
        None => session.store().unified_context(),
    };
    info!(
        operations = ops.len(),
        items = items.len(),
        "replayed {}",
        script.display()
    );

    let format = opts.format.unwrap_or(config.render.format);
    let rendered = match format {
        OutputFormat::Markdown => render_markdown(&items, &config.render.options()),
        OutputFormat::Json => render_json(&items).context("Failed to serialize context items")?,
    };
    Ok(rendered)
}

/// Parse `script` without applying it; returns the operation count.
pub fn run_check(script: &Path) -> Result<usize> {
    Ok(read_script(script)?.len())
}
