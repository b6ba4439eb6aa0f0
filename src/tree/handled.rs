//! Run-scoped record of every issue already visited.

use crate::domain::Issue;
use crate::tree::node::NodeId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HandledEntry {
    /// `None` when the issue was pruned as terminal.
    pub node: Option<NodeId>,
    pub issue: Issue,
    /// Insertion position, starting at zero.
    pub seq: usize,
}

#[derive(Debug, Default)]
pub struct HandledSet {
    entries: HashMap<String, HandledEntry>,
    order: Vec<String>,
}

impl HandledSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&HandledEntry> {
        self.entries.get(key)
    }

    /// Node recorded for `key`, if it was handled and not pruned.
    pub fn node_of(&self, key: &str) -> Option<NodeId> {
        self.entries.get(key).and_then(|e| e.node)
    }

    /// Record `issue` once. Returns `false` (and keeps the first entry) when
    /// the key was already handled.
    pub fn record(&mut self, issue: Issue, node: Option<NodeId>) -> bool {
        if self.entries.contains_key(&issue.key) {
            return false;
        }
        let seq = self.order.len();
        self.order.push(issue.key.clone());
        self.entries.insert(issue.key.clone(), HandledEntry { node, issue, seq });
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueType;

    #[test]
    fn record_is_at_most_once_per_key() {
        let mut handled = HandledSet::new();
        assert!(handled.record(Issue::new("SWG-201", IssueType::Story, "Closed"), None));
        assert!(!handled.record(Issue::new("SWG-201", IssueType::Story, "To Do"), None));
        assert_eq!(handled.len(), 1);
        let entry = handled.get("SWG-201").expect("entry");
        assert_eq!(entry.issue.status, "Closed");
        assert!(entry.node.is_none());
        assert_eq!(entry.seq, 0);
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut handled = HandledSet::new();
        for key in ["SWG-1", "SWG-12", "SWG-200"] {
            handled.record(Issue::new(key, IssueType::Story, "To Do"), None);
        }
        assert_eq!(handled.keys().collect::<Vec<_>>(), vec!["SWG-1", "SWG-12", "SWG-200"]);
        assert_eq!(handled.get("SWG-200").map(|e| e.seq), Some(2));
    }
}
