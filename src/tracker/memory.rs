//! In-memory issue source backed by a JSON snapshot.
//!
//! The snapshot uses the tracker's own response shapes so it goes through
//! the same decoder as live data:
//!
//! ```json
//! {
//!   "issues": [ { "key": "SWG-1", "fields": { ... }, "changelog": { ... } } ],
//!   "issueLinks": [ { "id": "10", "type": { ... }, "inwardIssue": { ... }, "outwardIssue": { ... } } ],
//!   "comments": { "SWG-1": [ { "author": { "displayName": "A" }, "body": "..." } ] }
//! }
//! ```
//!
//! A bare array of issues is accepted as well.

use crate::domain::{ChangeItem, Comment, FieldMap, Issue, Link, LinkRef};
use crate::tracker::decode::{decode_changelog, decode_comments, decode_issue, decode_link_detail};
use crate::tracker::{IssueQuery, IssueSource, TrackerError};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct MemorySource {
    issues: RefCell<Vec<Issue>>,
    link_details: HashMap<String, Value>,
    comments: HashMap<String, Vec<Comment>>,
    changelogs: HashMap<String, Vec<ChangeItem>>,
    fields: FieldMap,
    updates: RefCell<Vec<(String, Map<String, Value>)>>,
    fetches: Cell<usize>,
}

impl MemorySource {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self { issues: RefCell::new(issues), ..Self::default() }
    }

    pub fn load(path: &Path, fields: &FieldMap) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading snapshot: {}", path.display()))?;
        Self::from_json_str(&content, fields)
            .with_context(|| format!("Invalid snapshot: {}", path.display()))
    }

    pub fn from_json_str(content: &str, fields: &FieldMap) -> Result<Self> {
        let raw: Value = serde_json::from_str(content).context("Invalid JSON")?;
        let (issue_values, root) = match &raw {
            Value::Array(items) => (items.as_slice(), None),
            Value::Object(_) => (
                raw.get("issues").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]),
                Some(&raw),
            ),
            _ => anyhow::bail!("snapshot must be an object or an array of issues"),
        };

        let mut issues = Vec::with_capacity(issue_values.len());
        let mut changelogs = HashMap::new();
        for value in issue_values {
            let issue = decode_issue(value, fields)?;
            if value.get("changelog").is_some() {
                changelogs.insert(issue.key.clone(), decode_changelog(value));
            }
            issues.push(issue);
        }

        let mut link_details = HashMap::new();
        let mut comments = HashMap::new();
        if let Some(root) = root {
            for link in root.get("issueLinks").and_then(Value::as_array).into_iter().flatten() {
                if let Some(id) = link.get("id").and_then(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }) {
                    link_details.insert(id, link.clone());
                }
            }
            if let Some(map) = root.get("comments").and_then(Value::as_object) {
                for (key, list) in map {
                    comments.insert(key.clone(), decode_comments(&json!({ "comments": list })));
                }
            }
        }

        Ok(Self {
            issues: RefCell::new(issues),
            link_details,
            comments,
            changelogs,
            fields: fields.clone(),
            ..Self::default()
        })
    }

    pub fn with_comments(mut self, key: &str, comments: Vec<Comment>) -> Self {
        self.comments.insert(key.to_string(), comments);
        self
    }

    pub fn with_changelog(mut self, key: &str, items: Vec<ChangeItem>) -> Self {
        self.changelogs.insert(key.to_string(), items);
        self
    }

    /// Updates received so far, in call order.
    pub fn updates(&self) -> Vec<(String, Map<String, Value>)> {
        self.updates.borrow().clone()
    }

    /// Number of single-issue fetches served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    fn issue_type_of(&self, key: &str) -> Option<crate::domain::IssueType> {
        self.issues.borrow().iter().find(|i| i.key == key).and_then(|i| i.issue_type.clone())
    }
}

impl IssueSource for MemorySource {
    fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, TrackerError> {
        Ok(self.issues.borrow().iter().filter(|i| query.matches(i)).cloned().collect())
    }

    fn fetch(&self, key: &str) -> Result<Issue, TrackerError> {
        self.fetches.set(self.fetches.get() + 1);
        self.issues
            .borrow()
            .iter()
            .find(|i| i.key == key)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(key.to_string()))
    }

    fn update(&self, key: &str, fields: &Map<String, Value>) -> Result<(), TrackerError> {
        let mut issues = self.issues.borrow_mut();
        let issue = issues
            .iter_mut()
            .find(|i| i.key == key)
            .ok_or_else(|| TrackerError::NotFound(key.to_string()))?;
        if let Some(v) = fields.get(&self.fields.fte_next_cycle).and_then(Value::as_f64) {
            issue.fte_next_cycle = Some(v);
        }
        if let Some(v) = fields.get(&self.fields.fte_remaining).and_then(Value::as_f64) {
            issue.fte_remaining = Some(v);
        }
        self.updates.borrow_mut().push((key.to_string(), fields.clone()));
        Ok(())
    }

    fn link_detail(&self, link: &LinkRef) -> Result<Link, TrackerError> {
        if let Some(raw) = self.link_details.get(&link.id) {
            return decode_link_detail(raw, &link.from_key);
        }
        let embedded = self
            .issues
            .borrow()
            .iter()
            .find(|i| i.key == link.from_key)
            .and_then(|i| i.links.iter().find(|l| l.id == link.id).cloned())
            .ok_or_else(|| TrackerError::NotFound(format!("issue link {}", link.id)))?;
        let other_type = embedded.other_type.clone().or_else(|| self.issue_type_of(&embedded.other_key));
        Ok(Link { other_type, ..embedded })
    }

    fn comments(&self, key: &str) -> Result<Vec<Comment>, TrackerError> {
        Ok(self.comments.get(key).cloned().unwrap_or_default())
    }

    fn changelog(&self, key: &str) -> Result<Vec<ChangeItem>, TrackerError> {
        Ok(self.changelogs.get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueType, LinkDirection};
    use crate::tracker::StatusFilter;

    const SNAPSHOT: &str = r#"{
        "issues": [
            {"key": "SWG-1", "fields": {"summary": "Init", "issuetype": {"name": "Initiative"},
                "status": {"name": "To Do"}, "issuelinks": [
                    {"id": "7", "type": {"name": "Implements"}, "inwardIssue": {"key": "SWG-12"}}
                ]}},
            {"key": "SWG-12", "fields": {"summary": "Epic", "issuetype": {"name": "Epic"},
                "status": {"name": "Closed"}, "issuelinks": [
                    {"id": "7", "type": {"name": "Implements"}, "outwardIssue": {"key": "SWG-1"}}
                ]},
             "changelog": {"histories": [{"created": "2019-01-01", "items": [
                {"field": "Fix Version", "toString": "2019.06"}]}]}}
        ],
        "comments": {"SWG-12": [{"body": "one"}, {"body": "two"}]}
    }"#;

    #[test]
    fn loads_snapshot_and_filters_queries() {
        let source = MemorySource::from_json_str(SNAPSHOT, &FieldMap::default()).expect("load");
        let open = source
            .search(&IssueQuery::project("SWG").with_status(StatusFilter::Open))
            .expect("search");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].key, "SWG-1");
        assert_eq!(source.comments("SWG-12").expect("comments").len(), 2);
        assert_eq!(source.changelog("SWG-12").expect("changelog").len(), 1);
    }

    #[test]
    fn link_detail_fills_in_the_other_type() {
        let source = MemorySource::from_json_str(SNAPSHOT, &FieldMap::default()).expect("load");
        let link = source
            .link_detail(&LinkRef { id: "7".into(), from_key: "SWG-12".into() })
            .expect("link");
        assert_eq!(link.other_key, "SWG-1");
        assert_eq!(link.direction, LinkDirection::Outward);
        assert_eq!(link.other_type, Some(IssueType::Initiative));
    }

    #[test]
    fn updates_are_recorded_and_visible_to_fetch() {
        let fields = FieldMap::default();
        let source = MemorySource::from_issues(vec![Issue::new("SWG-1", IssueType::Initiative, "To Do")]);
        let mut update = Map::new();
        update.insert(fields.fte_remaining.clone(), json!(0.5));
        source.update("SWG-1", &update).expect("update");
        assert_eq!(source.updates().len(), 1);
        assert_eq!(source.fetch("SWG-1").expect("fetch").fte_remaining, Some(0.5));
    }

    #[test]
    fn fetch_of_unknown_key_is_not_found() {
        let source = MemorySource::from_issues(Vec::new());
        assert!(matches!(source.fetch("SWG-9"), Err(TrackerError::NotFound(_))));
    }
}
