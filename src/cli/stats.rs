//! Stats command: fix-version churn per Epic and Initiative.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::session::{GlobalArgs, ProjectArgs, Session};
use super::utils::{parse_issue_key, write_output};
use crate::domain::IssueType;
use crate::reports::fix_version_churn;
use crate::tracker::IssueQuery;

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only this issue
    #[arg(short, long, value_name = "KEY", value_parser = parse_issue_key)]
    pub key: Option<String>,

    /// Destination, `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "stats.txt")]
    pub output: PathBuf,
}

pub fn run(args: StatsArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let source = session.source();

    let keys = match args.key {
        Some(key) => vec![key],
        None => {
            let query = IssueQuery::project(&args.project.project)
                .with_types(&[IssueType::Epic, IssueType::Initiative]);
            tracing::info!("JQL: \"{}\"", query.to_jql());
            source.search(&query)?.into_iter().map(|issue| issue.key).collect()
        }
    };
    tracing::info!("Reading changelogs of {} issues", keys.len());

    let mut out = String::new();
    for key in &keys {
        let churn = fix_version_churn(source, key, &session.config.ignored_fix_versions)?;
        out.push_str(&churn.line());
        out.push('\n');
    }
    write_output(&args.output, &out)
}
