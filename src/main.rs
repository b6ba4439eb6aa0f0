//! jiramap: turn Jira issue links into mind maps and estimate reports.

use anyhow::Result;

fn main() -> Result<()> {
    jiramap::cli::run()
}
