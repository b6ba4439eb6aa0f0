//! Estimate command: sum Epic estimates per Initiative and optionally write
//! them back.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::session::{GlobalArgs, ProjectArgs, Session};
use super::utils::{parse_issue_key, write_output};
use crate::domain::IssueType;
use crate::estimate::{
    aggregate, group_by_initiative, write_back, write_ignore_list, IgnoreList, UpdateOptions,
    UpdateOutcome, DEFAULT_IGNORE_FILE,
};
use crate::render::render_estimates;
use crate::tracker::{IssueQuery, StatusFilter};

#[derive(Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only these Epics (comma-separated keys)
    #[arg(long, value_name = "KEYS", value_delimiter = ',', value_parser = parse_issue_key)]
    pub epic: Option<Vec<String>>,

    /// Write the computed remaining FTE back to each Initiative
    #[arg(short, long)]
    pub update: bool,

    /// Also write the next-cycle FTE
    #[arg(long, requires = "update")]
    pub next_cycle: bool,

    /// Log what would be written instead of writing it
    #[arg(long, requires = "update")]
    pub dry_run: bool,

    /// Leave Initiatives listed in this file untouched
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_IGNORE_FILE
    )]
    pub ignore: Option<PathBuf>,

    /// Write every reported Initiative to an ignore file
    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_IGNORE_FILE
    )]
    pub create_ignore_list: Option<PathBuf>,

    /// Report destination, `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub output: PathBuf,
}

pub fn run(args: EstimateArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let source = session.source();
    let config = &session.config;
    let project = &args.project.project;

    let mut query = IssueQuery::project(project)
        .with_types(&[IssueType::Epic])
        .with_status(StatusFilter::Open);
    if let Some(keys) = args.epic {
        query = query.with_keys(keys);
    }
    let epics = source.search(&query)?;
    tracing::info!("Found {} open epics in {}", epics.len(), project);

    let groups = group_by_initiative(source, epics, &config.structural_link)?;
    let estimates = aggregate(source, &groups, &config.next_cycle_label)?;
    write_output(&args.output, &render_estimates(&estimates))?;

    if args.update {
        let ignore = match &args.ignore {
            Some(path) => IgnoreList::load(path)?,
            None => IgnoreList::default(),
        };
        let options = UpdateOptions { include_next_cycle: args.next_cycle, dry_run: args.dry_run };
        let mut updated = 0usize;
        for estimate in &estimates {
            if write_back(source, &config.fields, estimate, &ignore, options)? == UpdateOutcome::Updated {
                updated += 1;
            }
        }
        tracing::info!("Updated {} of {} initiatives", updated, estimates.len());
    }

    if let Some(path) = &args.create_ignore_list {
        write_ignore_list(path, estimates.iter().map(|e| (e.key.as_str(), e.summary.as_str())))?;
        tracing::info!("Wrote ignore list {}", path.display());
    }
    Ok(())
}
