//! Second sweep over the whole project for issues the primary tree missed.

use crate::domain::IssueType;
use crate::tracker::IssueQuery;
use crate::tree::builder::build_node;
use crate::tree::context::RunContext;
use crate::tree::node::NodeId;
use anyhow::{Context, Result};
use tracing::{debug, info, trace};

/// Upper bound on reconciliation passes.
pub const MAX_RECONCILE_PASSES: usize = 3;

/// Result of one orphan sweep.
#[derive(Debug, Default)]
pub struct OrphanPass {
    /// Nodes created in this pass that found no parent.
    pub roots: Vec<NodeId>,
    /// Handled-set entries added by this pass.
    pub new_entries: usize,
}

/// One sweep: classify every unhandled open issue and build it without a
/// parent context, so the parent-field fallback gets a chance.
pub fn build_orphans(ctx: &mut RunContext<'_>, project: &str) -> Result<OrphanPass> {
    let before = ctx.handled.len();
    let all = ctx
        .source
        .search(&IssueQuery::project(project))
        .with_context(|| format!("Failed to list issues of {project}"))?;

    let mut initiatives = Vec::new();
    let mut epics = Vec::new();
    let mut stories = Vec::new();
    for issue in all {
        if ctx.handled.contains(&issue.key) || issue.is_terminal() {
            continue;
        }
        let bucket = match &issue.issue_type {
            Some(IssueType::Initiative) => &mut initiatives,
            Some(IssueType::Epic) => &mut epics,
            Some(IssueType::Story) => &mut stories,
            other => {
                trace!("Ignoring {} of type {:?}", issue.key, other);
                continue;
            }
        };
        bucket.push(issue);
    }
    debug!(
        "Orphan candidates: {} initiatives, {} epics, {} stories",
        initiatives.len(),
        epics.len(),
        stories.len()
    );

    let mut roots = Vec::new();
    for issue in initiatives.into_iter().chain(epics).chain(stories) {
        // An earlier candidate may have pulled this one in through its links.
        if ctx.handled.contains(&issue.key) {
            continue;
        }
        if let Some(id) = build_node(ctx, issue, None)? {
            if ctx.forest.get(id).parent().is_none() {
                roots.push(id);
            }
        }
    }

    Ok(OrphanPass { roots, new_entries: ctx.handled.len() - before })
}

/// Run [`build_orphans`] until a pass adds nothing, at most `max_passes`
/// times, and return the orphan roots of all passes.
pub fn reconcile(ctx: &mut RunContext<'_>, project: &str, max_passes: usize) -> Result<Vec<NodeId>> {
    let mut roots = Vec::new();
    for pass in 1..=max_passes.max(1) {
        let result = build_orphans(ctx, project)?;
        info!(
            "Orphan pass {}: {} new entries, {} orphan roots",
            pass,
            result.new_entries,
            result.roots.len()
        );
        roots.extend(result.roots);
        if result.new_entries == 0 {
            break;
        }
    }
    ctx.forest.sort_ids(&mut roots);
    Ok(roots)
}
