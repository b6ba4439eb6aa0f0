//! Top-down Initiative → Epic → Story construction.

use crate::domain::{Issue, IssueType, Link, LinkDirection};
use crate::tracker::{IssueQuery, StatusFilter};
use crate::tree::context::{ParentConflict, RunContext};
use crate::tree::node::NodeId;
use anyhow::{Context, Result};
use tracing::{debug, error, info};

/// Build the primary tree for `project` and return its Initiative roots.
pub fn build_tree(ctx: &mut RunContext<'_>, project: &str) -> Result<Vec<NodeId>> {
    let query = IssueQuery::project(project)
        .with_types(&[IssueType::Initiative])
        .with_status(StatusFilter::Open);
    let initiatives = ctx
        .source
        .search(&query)
        .with_context(|| format!("Failed to list initiatives of {project}"))?;
    info!("Found {} open initiatives in {}", initiatives.len(), project);

    let mut roots = Vec::new();
    for issue in initiatives {
        if ctx.handled.contains(&issue.key) {
            continue;
        }
        if !issue.is_type(&IssueType::Initiative) {
            debug!("Skipping {}: not an initiative", issue.key);
            continue;
        }
        if let Some(id) = build_node(ctx, issue, None)? {
            roots.push(id);
        }
    }
    Ok(roots)
}

/// Construct the node for `issue` and recurse into its structural children.
///
/// Terminal issues are recorded as handled without a node. When `parent` is
/// `None`, Epics and Stories try the single-valued parent field against
/// nodes that are already handled.
pub(crate) fn build_node(
    ctx: &mut RunContext<'_>,
    issue: Issue,
    parent: Option<NodeId>,
) -> Result<Option<NodeId>> {
    if issue.is_terminal() {
        debug!("Pruning {} ({})", issue.key, issue.status);
        ctx.handled.record(issue, None);
        return Ok(None);
    }

    let id = ctx.create_node(&issue);
    match parent {
        Some(parent_id) => {
            ctx.forest.add_child(parent_id, id);
        }
        None if !issue.is_type(&IssueType::Initiative) => attach_via_parent_field(ctx, id, &issue),
        None => {}
    }

    let child_level = issue.issue_type.as_ref().and_then(IssueType::child_level);
    let child_links: Vec<Link> = match &child_level {
        Some(_) => issue
            .links_of(&ctx.settings.structural_link, LinkDirection::Inward)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    ctx.handled.record(issue, Some(id));

    if let Some(expected) = child_level {
        for link in child_links {
            visit_child(ctx, &link, &expected, id)?;
        }
    }
    Ok(Some(id))
}

fn visit_child(
    ctx: &mut RunContext<'_>,
    link: &Link,
    expected: &IssueType,
    parent: NodeId,
) -> Result<()> {
    if let Some(other_type) = &link.other_type {
        if other_type != expected {
            debug!("Skipping {} link to {} ({})", link.link_type, link.other_key, other_type);
            return Ok(());
        }
    }
    if ctx.handled.contains(&link.other_key) {
        note_revisit(ctx, &link.other_key, expected, parent);
        return Ok(());
    }

    let issue = ctx.fetch(&link.other_key)?;
    if !issue.is_type(expected) {
        debug!(
            "Skipping {}: expected {} but found {}",
            issue.key,
            expected,
            issue.issue_type.as_ref().map(IssueType::name).unwrap_or("no type")
        );
        return Ok(());
    }
    build_node(ctx, issue, Some(parent))?;
    Ok(())
}

/// A structural link reached an issue that is already handled. Same parent
/// is a duplicate link; a different parent is a conflict and the first one
/// stays.
fn note_revisit(ctx: &mut RunContext<'_>, key: &str, expected: &IssueType, parent: NodeId) {
    let Some(entry) = ctx.handled.get(key) else {
        return;
    };
    if !entry.issue.is_type(expected) {
        return;
    }
    let Some(node_id) = entry.node else {
        return;
    };
    let parent_key = ctx.forest.get(parent).key().to_string();
    let Some(kept) = ctx.forest.get(node_id).parent().map(str::to_string) else {
        debug!("{key} is already a root; not attaching it under {parent_key}");
        return;
    };
    if kept == parent_key {
        return;
    }
    error!("{key} has more than one parent: keeping {kept}, ignoring {parent_key}");
    ctx.conflicts.push(ParentConflict {
        child: key.to_string(),
        kept_parent: kept,
        ignored_parent: parent_key,
    });
}

fn attach_via_parent_field(ctx: &mut RunContext<'_>, id: NodeId, issue: &Issue) {
    let Some(parent_key) = issue.parent_key.as_deref() else {
        return;
    };
    match ctx.handled.node_of(parent_key) {
        Some(parent_id) => {
            if ctx.forest.add_child(parent_id, id) {
                debug!("Attached {} under {} via parent field", issue.key, parent_key);
            }
        }
        None => debug!("Parent {} of {} is not in the tree yet", parent_key, issue.key),
    }
}
