//! Command-line interface for jiramap
//!
//! Provides `outline`, `estimate`, `report`, `stats` and `completions`
//! subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod estimate;
mod outline;
mod report;
mod session;
mod stats;
mod utils;

pub use session::GlobalArgs;

/// Rebuild Jira Initiative → Epic → Story trees and the reports around them
#[derive(Parser)]
#[command(name = "jiramap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the issue tree of a project and write it as a mind map
    Outline(outline::OutlineArgs),

    /// Sum remaining Epic estimates per Initiative
    Estimate(estimate::EstimateArgs),

    /// Report recently closed work grouped by Initiative
    Report(report::ReportArgs),

    /// Count fix-version changes per Epic and Initiative
    Stats(stats::StatsArgs),

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `RUST_LOG` wins when set; otherwise DEBUG with `--verbose`, else WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(log_filter(cli.verbose))
        .try_init();

    match cli.command {
        Commands::Outline(args) => outline::run(args, &cli.global),
        Commands::Estimate(args) => estimate::run(args, &cli.global),
        Commands::Report(args) => report::run(args, &cli.global),
        Commands::Stats(args) => stats::run(args, &cli.global),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "jiramap", &mut std::io::stdout());
            Ok(())
        }
    }
}
