//! Operator-maintained list of Initiatives that must not be updated.
//!
//! One `<key> <summary>` pair per line; only the first token counts.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_IGNORE_FILE: &str = "ignore_estimate.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    keys: HashSet<String>,
}

impl IgnoreList {
    pub fn parse(content: &str) -> Self {
        let keys = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading ignore list: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Write a fully populated list, one entry per line.
pub fn write_ignore_list<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    let mut out = String::new();
    for (key, summary) in entries {
        let _ = writeln!(out, "{key} {summary}");
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed writing ignore list: {}", path.display()))
}
