//! Issue fixtures shared by the tree tests.

use crate::domain::{Issue, IssueType, Link, LinkDirection};

/// An `Implements` link as carried by the parent side.
pub fn implements(child: &str) -> Link {
    Link {
        id: format!("link-{child}"),
        link_type: "Implements".to_string(),
        direction: LinkDirection::Inward,
        other_key: child.to_string(),
        other_type: None,
    }
}

pub fn issue(key: &str, issue_type: IssueType, status: &str, links: &[Link]) -> Issue {
    let mut issue = Issue::new(key, issue_type, status);
    issue.summary = format!("Summary of {key}");
    issue.assignee = Some("Ann Example".to_string());
    issue.links = links.to_vec();
    issue
}

pub fn with_parent(mut issue: Issue, parent: &str) -> Issue {
    issue.parent_key = Some(parent.to_string());
    issue
}
