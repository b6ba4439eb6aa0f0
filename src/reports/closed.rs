//! Closed-work report: recently resolved issues grouped by Initiative.

use crate::domain::IssueType;
use crate::estimate::InitiativeGroups;
use crate::tracker::{IssueQuery, IssueSource, StatusFilter};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use std::fmt::Write as _;
use tracing::debug;

pub const DEFAULT_WEEKS: u32 = 5;

/// Comments are only shown for issues with more than this many.
const COMMENT_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSection {
    pub key: String,
    pub summary: String,
    pub lead_project: Option<String>,
    pub items: Vec<ClosedItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedItem {
    pub key: String,
    pub summary: String,
    /// Last two comment bodies, oldest first.
    pub recent_comments: Vec<String>,
}

/// Query for closed Epics, Initiatives and Stories resolved since `today - weeks`.
pub fn closed_query(project: &str, weeks: u32, today: NaiveDate, parent_field: &str) -> IssueQuery {
    let since = today - Duration::weeks(i64::from(weeks));
    IssueQuery::project(project)
        .with_types(&[IssueType::Epic, IssueType::Initiative, IssueType::Story])
        .with_status(StatusFilter::Terminal)
        .resolved_since(since)
        .order_by_desc(&jql_field(parent_field))
}

/// `customfield_10005` is spelled `cf[10005]` in JQL.
fn jql_field(field: &str) -> String {
    match field.strip_prefix("customfield_") {
        Some(id) => format!("cf[{id}]"),
        None => field.to_string(),
    }
}

pub fn closed_sections(
    source: &dyn IssueSource,
    groups: &InitiativeGroups,
    show_comments: bool,
) -> Result<Vec<ClosedSection>> {
    let mut sections = Vec::with_capacity(groups.len());
    for (initiative_key, issues) in groups.iter() {
        let initiative = source
            .fetch(initiative_key)
            .with_context(|| format!("Failed to fetch initiative {initiative_key}"))?;
        let mut items = Vec::with_capacity(issues.len());
        for issue in issues {
            let mut recent_comments = Vec::new();
            if show_comments {
                let comments = source
                    .comments(&issue.key)
                    .with_context(|| format!("Failed to fetch comments of {}", issue.key))?;
                debug!("{} has {} comments", issue.key, comments.len());
                if comments.len() > COMMENT_THRESHOLD {
                    recent_comments =
                        comments[comments.len() - 2..].iter().map(|c| c.body.clone()).collect();
                }
            }
            items.push(ClosedItem { key: issue.key.clone(), summary: issue.summary.clone(), recent_comments });
        }
        sections.push(ClosedSection {
            key: initiative.key,
            summary: initiative.summary,
            lead_project: initiative.lead_project,
            items,
        });
    }
    Ok(sections)
}

pub fn render_closed_report(sections: &[ClosedSection]) -> String {
    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "\n{}", "=".repeat(80));
        let _ = writeln!(out, "Lead Project: {}", section.lead_project.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "\n{} ({})", section.summary, section.key);
        let _ = writeln!(out, "* No. tickets closed: {}", section.items.len());
        for item in &section.items {
            let _ = writeln!(out, "* {}: {}", item.key, item.summary);
            if let [older, newer] = item.recent_comments.as_slice() {
                let _ = writeln!(out, "---\n{older}\n\n{newer}\n---\n");
            }
        }
    }
    out
}
