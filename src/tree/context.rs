//! Per-run state shared by the tree builder and the orphan reconciler.

use crate::domain::{Issue, IssueType};
use crate::tracker::IssueSource;
use crate::tree::handled::HandledSet;
use crate::tree::node::{Forest, Node, NodeId};
use anyhow::{Context, Result};
use indicatif::ProgressBar;

/// Options that shape how issues become nodes.
#[derive(Debug, Clone)]
pub struct TreeSettings {
    /// Link type treated as parent/child containment.
    pub structural_link: String,
    /// Server URL used for node links (`<base>/browse/<key>`).
    pub base_url: Option<String>,
    pub include_description: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self { structural_link: "Implements".to_string(), base_url: None, include_description: false }
    }
}

/// An issue reached through structural links from two different parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentConflict {
    pub child: String,
    pub kept_parent: String,
    pub ignored_parent: String,
}

/// Everything one tree-building run needs; constructed once and passed by
/// reference to every stage.
pub struct RunContext<'a> {
    pub source: &'a dyn IssueSource,
    pub settings: TreeSettings,
    pub handled: HandledSet,
    pub forest: Forest,
    pub conflicts: Vec<ParentConflict>,
    progress: ProgressBar,
}

impl<'a> RunContext<'a> {
    pub fn new(source: &'a dyn IssueSource, settings: TreeSettings) -> Self {
        Self {
            source,
            settings,
            handled: HandledSet::new(),
            forest: Forest::new(),
            conflicts: Vec::new(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub(crate) fn fetch(&self, key: &str) -> Result<Issue> {
        self.progress.set_message(format!("fetching {key}"));
        self.progress.tick();
        self.source.fetch(key).with_context(|| format!("Failed to fetch {key}"))
    }

    /// Build the node for `issue` and add it to the forest.
    pub(crate) fn create_node(&mut self, issue: &Issue) -> NodeId {
        let issue_type =
            issue.issue_type.clone().unwrap_or_else(|| IssueType::Other("Unknown".to_string()));
        let mut node = Node::new(issue.key.clone(), &issue.summary, issue_type);
        node.set_assignee(issue.assignee.clone());
        for sponsor in &issue.sponsors {
            node.add_sponsor(sponsor.clone());
        }
        node.set_state(&issue.status);
        if self.settings.include_description {
            node.set_description(issue.description.clone());
        }
        if let Some(base) = &self.settings.base_url {
            node.set_url(format!("{}/browse/{}", base.trim_end_matches('/'), issue.key));
        }
        self.progress.inc(1);
        self.forest.insert(node)
    }
}
