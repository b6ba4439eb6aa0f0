//! Issue tree reconstruction.
//!
//! [`build_tree`] walks open Initiatives top-down through structural links;
//! [`reconcile`] then sweeps the whole project for what it missed. Both
//! share one [`RunContext`], whose handled-set guarantees every issue is
//! visited at most once per run.

pub mod builder;
pub mod context;
pub mod handled;
pub mod node;
pub mod orphans;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::build_tree;
pub use context::{ParentConflict, RunContext, TreeSettings};
pub use handled::{HandledEntry, HandledSet};
pub use node::{Forest, Node, NodeId, COLOR_GREEN, COLOR_ORANGE, COLOR_RED};
pub use orphans::{build_orphans, reconcile, OrphanPass, MAX_RECONCILE_PASSES};

/// Primary roots and orphan roots of one run.
#[derive(Debug, Default)]
pub struct BuiltForest {
    pub initiatives: Vec<NodeId>,
    pub orphans: Vec<NodeId>,
}

/// Build the primary tree and reconcile orphans for `project`.
pub fn build_forest(ctx: &mut RunContext<'_>, project: &str) -> anyhow::Result<BuiltForest> {
    let mut initiatives = build_tree(ctx, project)?;
    ctx.forest.sort_ids(&mut initiatives);
    let orphans = reconcile(ctx, project, MAX_RECONCILE_PASSES)?;
    Ok(BuiltForest { initiatives, orphans })
}
