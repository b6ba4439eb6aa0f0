//! Report command: closed work of the last weeks, grouped by Initiative.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;

use super::session::{GlobalArgs, ProjectArgs, Session};
use super::utils::write_output;
use crate::estimate::group_by_initiative;
use crate::reports::{closed_query, closed_sections, render_closed_report, DEFAULT_WEEKS};

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Show the last two comments of issues with more than two
    #[arg(short = 'c', long)]
    pub show_comments: bool,

    /// How many weeks back to look
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_WEEKS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub weeks: u32,

    /// Report destination, `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub output: PathBuf,
}

pub fn run(args: ReportArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let source = session.source();
    let config = &session.config;

    let today = Local::now().date_naive();
    let query = closed_query(&args.project.project, args.weeks, today, &config.fields.parent);
    tracing::info!("Processing all issues found by JQL query: '{}'", query.to_jql());
    let closed = source.search(&query)?;

    let groups = group_by_initiative(source, closed, &config.structural_link)?;
    let sections = closed_sections(source, &groups, args.show_comments)?;
    write_output(&args.output, &render_closed_report(&sections))
}
