//! Tree nodes and the arena that owns them.

use crate::domain::{natural_cmp, IssueType};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub const COLOR_RED: &str = "#990000";
pub const COLOR_GREEN: &str = "#009900";
pub const COLOR_ORANGE: &str = "#ff6600";

/// Index of a node inside a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One issue as a tree node.
#[derive(Debug, Clone)]
pub struct Node {
    key: String,
    summary: String,
    issue_type: IssueType,
    assignee: Option<String>,
    sponsors: Vec<String>,
    description: Option<String>,
    parent: Option<String>,
    children: BTreeMap<String, NodeId>,
    status: Option<String>,
    color: Option<String>,
    sort_weight: u8,
    url: Option<String>,
}

impl Node {
    pub fn new(key: impl Into<String>, summary: &str, issue_type: IssueType) -> Self {
        Self {
            key: key.into(),
            summary: sanitize_summary(summary),
            issue_type,
            assignee: None,
            sponsors: Vec::new(),
            description: None,
            parent: None,
            children: BTreeMap::new(),
            status: None,
            color: None,
            sort_weight: 3,
            url: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn issue_type(&self) -> &IssueType {
        &self.issue_type
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn set_assignee(&mut self, assignee: Option<String>) {
        self.assignee = assignee;
    }

    pub fn sponsors(&self) -> &[String] {
        &self.sponsors
    }

    pub fn add_sponsor(&mut self, sponsor: impl Into<String>) {
        self.sponsors.push(sponsor.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Update the status and recompute the sort weight.
    pub fn set_state(&mut self, status: &str) {
        self.sort_weight = match status {
            "In Progress" => 1,
            "To Do" | "Blocked" => 2,
            _ => 3,
        };
        self.status = Some(status.to_string());
    }

    pub fn sort_weight(&self) -> u8 {
        self.sort_weight
    }

    /// Explicit color; wins over the status-derived one from then on.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(color.into());
    }

    pub fn color(&self) -> &str {
        if let Some(color) = &self.color {
            return color;
        }
        if self.assignee.is_none() {
            return COLOR_RED;
        }
        match self.status.as_deref() {
            Some("In Progress") => COLOR_GREEN,
            Some("Blocked") | Some("To Do") => COLOR_ORANGE,
            _ => COLOR_RED,
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Canonical sibling order: sort weight, then natural key order.
    pub fn canonical_cmp(&self, other: &Node) -> Ordering {
        self.sort_weight.cmp(&other.sort_weight).then_with(|| natural_cmp(&self.key, &other.key))
    }
}

/// Make a summary safe to place in a markup attribute.
pub fn sanitize_summary(summary: &str) -> String {
    summary.replace('"', "'").replace('&', "and")
}

/// Arena owning every node built during one run.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; a key that is already present keeps its first node.
    pub fn insert(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.index.get(node.key()) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(node.key.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach `child` under `parent`.
    ///
    /// Re-attaching to the same parent is a no-op. A child that already has a
    /// different parent is left untouched and `false` is returned.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child {
            return false;
        }
        let parent_key = self.get(parent).key.clone();
        let child_node = self.get_mut(child);
        if let Some(existing) = child_node.parent.as_deref() {
            if existing != parent_key {
                return false;
            }
        }
        child_node.parent = Some(parent_key);
        let child_key = child_node.key.clone();
        self.get_mut(parent).children.insert(child_key, child);
        true
    }

    /// Children of `id` in canonical order.
    pub fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = self.get(id).child_ids().collect();
        self.sort_ids(&mut children);
        children
    }

    pub fn sort_ids(&self, ids: &mut [NodeId]) {
        ids.sort_by(|a, b| self.get(*a).canonical_cmp(self.get(*b)));
    }

    /// All node ids in `roots` and their descendants, depth first.
    pub fn descendants(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.sorted_children(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, status: &str) -> Node {
        let mut n = Node::new(key, "summary", IssueType::Story);
        n.set_assignee(Some("Joakim".into()));
        n.set_state(status);
        n
    }

    #[test]
    fn summary_is_sanitized_for_markup() {
        let n = Node::new("SWG-1", "Say \"hi\" & bye", IssueType::Initiative);
        assert_eq!(n.summary(), "Say 'hi' and bye");
    }

    #[test]
    fn sort_weight_follows_status() {
        assert_eq!(node("SWG-1", "In Progress").sort_weight(), 1);
        assert_eq!(node("SWG-1", "To Do").sort_weight(), 2);
        assert_eq!(node("SWG-1", "Blocked").sort_weight(), 2);
        assert_eq!(node("SWG-1", "Done").sort_weight(), 3);
    }

    #[test]
    fn color_from_status_and_assignee() {
        assert_eq!(node("SWG-1", "In Progress").color(), COLOR_GREEN);
        assert_eq!(node("SWG-1", "Blocked").color(), COLOR_ORANGE);
        assert_eq!(node("SWG-1", "To Do").color(), COLOR_ORANGE);
        assert_eq!(node("SWG-1", "Review").color(), COLOR_RED);

        let mut unassigned = Node::new("SWG-2", "x", IssueType::Epic);
        unassigned.set_state("In Progress");
        assert_eq!(unassigned.color(), COLOR_RED);
    }

    #[test]
    fn explicit_color_overrides_status_permanently() {
        let mut n = node("SWG-14", "To Do");
        n.set_color("#0000FF");
        n.set_state("In Progress");
        assert_eq!(n.color(), "#0000FF");
    }

    #[test]
    fn siblings_sort_in_progress_then_todo_then_rest() {
        let mut forest = Forest::new();
        let parent = forest.insert(node("SWG-12", "To Do"));
        for (key, status) in [("SWG-200", "To Do"), ("SWG-201", "In Progress"), ("SWG-202", "Done")] {
            let child = forest.insert(node(key, status));
            forest.add_child(parent, child);
        }
        let statuses: Vec<&str> = forest
            .sorted_children(parent)
            .into_iter()
            .map(|id| forest.get(id).status().unwrap_or_default())
            .collect();
        assert_eq!(statuses, vec!["In Progress", "To Do", "Done"]);
    }

    #[test]
    fn ties_break_by_natural_key_order() {
        let mut forest = Forest::new();
        let parent = forest.insert(node("SWG-1", "To Do"));
        for key in ["SWG-100", "SWG-20", "SWG-3"] {
            let child = forest.insert(node(key, "To Do"));
            forest.add_child(parent, child);
        }
        let keys: Vec<String> = forest
            .sorted_children(parent)
            .into_iter()
            .map(|id| forest.get(id).key().to_string())
            .collect();
        assert_eq!(keys, vec!["SWG-3", "SWG-20", "SWG-100"]);
    }

    #[test]
    fn add_child_is_idempotent_and_never_reparents() {
        let mut forest = Forest::new();
        let a = forest.insert(node("SWG-1", "To Do"));
        let b = forest.insert(node("SWG-2", "To Do"));
        let c = forest.insert(node("SWG-3", "To Do"));

        assert!(forest.add_child(a, c));
        assert!(forest.add_child(a, c));
        assert_eq!(forest.get(a).child_count(), 1);

        assert!(!forest.add_child(b, c));
        assert_eq!(forest.get(c).parent(), Some("SWG-1"));
        assert_eq!(forest.get(b).child_count(), 0);
    }

    #[test]
    fn insert_keeps_the_first_node_per_key() {
        let mut forest = Forest::new();
        let first = forest.insert(node("SWG-1", "To Do"));
        let second = forest.insert(node("SWG-1", "In Progress"));
        assert_eq!(first, second);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(first).status(), Some("To Do"));
    }
}
