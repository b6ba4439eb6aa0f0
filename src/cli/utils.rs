//! Shared CLI utilities.

use crate::domain::{is_issue_key, is_project_key};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub fn parse_project_key(value: &str) -> Result<String, String> {
    let key = value.trim().to_ascii_uppercase();
    if is_project_key(&key) {
        Ok(key)
    } else {
        Err(format!("'{value}' is not a project key (expected something like SWG)"))
    }
}

pub fn parse_issue_key(value: &str) -> Result<String, String> {
    let key = value.trim().to_ascii_uppercase();
    if is_issue_key(&key) {
        Ok(key)
    } else {
        Err(format!("'{value}' is not an issue key (expected something like SWG-123)"))
    }
}

/// Spinner on stderr; stays invisible when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{pos} nodes, {elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Write a payload to `target`, where `-` means stdout.
pub fn write_output(target: &Path, content: &str) -> Result<()> {
    if target == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes()).context("Failed writing to stdout")?;
        stdout.flush()?;
        return Ok(());
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating directory: {}", parent.display()))?;
    }
    fs::write(target, content).with_context(|| format!("Failed writing {}", target.display()))?;
    tracing::info!("Wrote {}", target.display());
    Ok(())
}
