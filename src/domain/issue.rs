//! Issue records as seen by the tree builder and the estimate tools.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status names that mark an issue as finished.
pub const TERMINAL_STATUSES: &[&str] = &["Closed", "Resolved"];

/// The same set, as a JQL list.
pub const TERMINAL_STATUSES_JQL: &str = "Resolved, Closed";

pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// The three-level hierarchy, plus anything else the tracker knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    Initiative,
    Epic,
    Story,
    Other(String),
}

impl IssueType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Initiative" => IssueType::Initiative,
            "Epic" => IssueType::Epic,
            "Story" => IssueType::Story,
            other => IssueType::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            IssueType::Initiative => "Initiative",
            IssueType::Epic => "Epic",
            IssueType::Story => "Story",
            IssueType::Other(name) => name,
        }
    }

    /// Single letter used in outline labels.
    pub fn letter(&self) -> char {
        match self {
            IssueType::Epic => 'E',
            IssueType::Story => 'S',
            _ => 'I',
        }
    }

    /// The type expected one level below this one in the hierarchy.
    pub fn child_level(&self) -> Option<IssueType> {
        match self {
            IssueType::Initiative => Some(IssueType::Epic),
            IssueType::Epic => Some(IssueType::Story),
            _ => None,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a link relative to the issue that carries it.
///
/// On an Initiative, an `Implements` link whose other side is an Epic is
/// `Inward` ("is implemented by"); on that Epic the same link is `Outward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkDirection {
    Inward,
    Outward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub link_type: String,
    pub direction: LinkDirection,
    pub other_key: String,
    /// Type of the linked issue when the tracker embedded it in the link.
    pub other_type: Option<IssueType>,
}

impl Link {
    pub fn to_link_ref(&self, from_key: &str) -> LinkRef {
        LinkRef { id: self.id.clone(), from_key: from_key.to_string() }
    }
}

/// Lightweight handle used to ask the tracker for a link's full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub id: String,
    pub from_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub issue_type: Option<IssueType>,
    pub status: String,
    /// `None` when unassigned; `Some("Unknown")` when the record could not
    /// be resolved to a name.
    pub assignee: Option<String>,
    pub sponsors: Vec<String>,
    pub labels: Vec<String>,
    pub links: Vec<Link>,
    pub description: Option<String>,
    /// Single-valued parent field (the "Epic link" style fallback).
    pub parent_key: Option<String>,
    pub remaining_estimate_seconds: Option<u64>,
    pub fte_next_cycle: Option<f64>,
    pub fte_remaining: Option<f64>,
    pub lead_project: Option<String>,
}

impl Issue {
    pub fn new(key: impl Into<String>, issue_type: IssueType, status: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            issue_type: Some(issue_type),
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal_status(&self.status)
    }

    pub fn is_type(&self, expected: &IssueType) -> bool {
        self.issue_type.as_ref() == Some(expected)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Links of `link_type` pointing in `direction`, in tracker order.
    pub fn links_of<'a>(
        &'a self,
        link_type: &'a str,
        direction: LinkDirection,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.link_type == link_type && l.direction == direction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<String>,
    pub body: String,
}

/// One field change from an issue's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub created: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_closed_and_resolved() {
        assert!(is_terminal_status("Closed"));
        assert!(is_terminal_status("Resolved"));
        assert!(!is_terminal_status("Done"));
        assert!(!is_terminal_status("In Progress"));
    }

    #[test]
    fn issue_type_round_trips_names_and_letters() {
        assert_eq!(IssueType::from_name("Epic"), IssueType::Epic);
        assert_eq!(IssueType::from_name("Bug"), IssueType::Other("Bug".to_string()));
        assert_eq!(IssueType::Story.letter(), 'S');
        assert_eq!(IssueType::Initiative.letter(), 'I');
        assert_eq!(IssueType::Initiative.child_level(), Some(IssueType::Epic));
        assert_eq!(IssueType::Story.child_level(), None);
    }

    #[test]
    fn links_of_filters_type_and_direction() {
        let mut issue = Issue::new("SWG-1", IssueType::Initiative, "To Do");
        issue.links = vec![
            Link {
                id: "1".into(),
                link_type: "Implements".into(),
                direction: LinkDirection::Inward,
                other_key: "SWG-12".into(),
                other_type: Some(IssueType::Epic),
            },
            Link {
                id: "2".into(),
                link_type: "Relates".into(),
                direction: LinkDirection::Inward,
                other_key: "SWG-13".into(),
                other_type: None,
            },
            Link {
                id: "3".into(),
                link_type: "Implements".into(),
                direction: LinkDirection::Outward,
                other_key: "SWG-14".into(),
                other_type: None,
            },
        ];
        let keys: Vec<&str> = issue
            .links_of("Implements", LinkDirection::Inward)
            .map(|l| l.other_key.as_str())
            .collect();
        assert_eq!(keys, vec!["SWG-12"]);
    }
}
