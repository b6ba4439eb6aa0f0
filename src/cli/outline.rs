//! Outline command: build the issue tree and emit it.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::session::{GlobalArgs, ProjectArgs, Session};
use super::utils::{spinner, write_output};
use crate::render::{render_outline, render_text, OutlineDocument};
use crate::tree::{build_forest, ParentConflict, RunContext, TreeSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutlineFormat {
    /// Freeplane mind map (.mm)
    Freeplane,
    /// Indented plain text
    Text,
}

#[derive(Args)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Attach issue descriptions as hidden rich content
    #[arg(long)]
    pub desc: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutlineFormat::Freeplane)]
    pub format: OutlineFormat,

    /// Output file, `-` for stdout [default: <PROJECT>.mm, or stdout for text]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: OutlineArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let project = args.project.project;
    let settings = TreeSettings {
        structural_link: session.config.structural_link.clone(),
        base_url: Some(session.server.clone()),
        include_description: args.desc,
    };

    let progress = spinner(&format!("Building {project} tree"));
    let mut ctx = RunContext::new(session.source(), settings).with_progress(progress.clone());
    let built = build_forest(&mut ctx, &project);
    progress.finish_and_clear();
    let built = built?;

    tracing::info!(
        "{}: {} initiatives, {} orphan roots, {} nodes, {} issues handled",
        project,
        built.initiatives.len(),
        built.orphans.len(),
        ctx.forest.len(),
        ctx.handled.len()
    );
    report_conflicts(&ctx.conflicts);

    let content = match args.format {
        OutlineFormat::Freeplane => render_outline(
            &ctx.forest,
            &OutlineDocument {
                project: &project,
                server: &session.server,
                initiatives: &built.initiatives,
                orphans: &built.orphans,
                include_description: args.desc,
            },
        ),
        OutlineFormat::Text => render_text(&ctx.forest, &built.initiatives, &built.orphans),
    };

    let target = args.output.unwrap_or_else(|| match args.format {
        OutlineFormat::Freeplane => PathBuf::from(format!("{project}.mm")),
        OutlineFormat::Text => PathBuf::from("-"),
    });
    write_output(&target, &content)
}

/// Summarize parent conflicts for operator review.
fn report_conflicts(conflicts: &[ParentConflict]) {
    if conflicts.is_empty() {
        return;
    }
    tracing::warn!("{} issues are linked from more than one parent; please review:", conflicts.len());
    for conflict in conflicts {
        tracing::warn!(
            "  {}: kept under {}, also linked from {}",
            conflict.child,
            conflict.kept_parent,
            conflict.ignored_parent
        );
    }
}
