//! Decoding of Jira REST JSON into domain records.
//!
//! Decoding is lenient about optional content: absent custom fields become
//! `None`, an assignee without a usable name becomes `"Unknown"`, and sponsor
//! entries that are not plain strings are skipped. Only a record without a
//! key is rejected.

use crate::domain::{ChangeItem, Comment, FieldMap, Issue, IssueType, Link, LinkDirection};
use crate::tracker::TrackerError;
use serde_json::Value;

pub const UNKNOWN_ASSIGNEE: &str = "Unknown";

pub fn decode_issue(raw: &Value, fields: &FieldMap) -> Result<Issue, TrackerError> {
    let key = raw
        .get("key")
        .and_then(Value::as_str)
        .ok_or_else(|| TrackerError::Decode("issue record without a key".to_string()))?
        .to_string();
    let empty = Value::Null;
    let f = raw.get("fields").unwrap_or(&empty);

    let links = f
        .get("issuelinks")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(decode_embedded_link).collect())
        .unwrap_or_default();

    Ok(Issue {
        summary: str_at(f, &["summary"]).unwrap_or_default(),
        issue_type: str_at(f, &["issuetype", "name"]).map(|n| IssueType::from_name(&n)),
        status: str_at(f, &["status", "name"]).unwrap_or_default(),
        assignee: decode_assignee(f.get("assignee")),
        sponsors: decode_sponsors(f.get(&fields.sponsors)),
        labels: f
            .get("labels")
            .and_then(Value::as_array)
            .map(|labels| labels.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default(),
        links,
        description: str_at(f, &["description"]),
        parent_key: decode_parent(f.get(&fields.parent)),
        remaining_estimate_seconds: f
            .get("timetracking")
            .and_then(|t| t.get("remainingEstimateSeconds"))
            .and_then(Value::as_u64),
        fte_next_cycle: f.get(&fields.fte_next_cycle).and_then(Value::as_f64),
        fte_remaining: f.get(&fields.fte_remaining).and_then(Value::as_f64),
        lead_project: decode_lead_project(f.get(&fields.lead_project)),
        key,
    })
}

/// Decode a link as it appears in an issue's `issuelinks` list.
fn decode_embedded_link(raw: &Value) -> Option<Link> {
    let id = id_string(raw.get("id")?)?;
    let link_type = str_at(raw, &["type", "name"])?;
    let (direction, other) = if let Some(inward) = raw.get("inwardIssue") {
        (LinkDirection::Inward, inward)
    } else {
        (LinkDirection::Outward, raw.get("outwardIssue")?)
    };
    Some(Link {
        id,
        link_type,
        direction,
        other_key: str_at(other, &["key"])?,
        other_type: str_at(other, &["fields", "issuetype", "name"])
            .map(|n| IssueType::from_name(&n)),
    })
}

/// Decode a standalone `issueLink/{id}` record as seen from `from_key`.
pub fn decode_link_detail(raw: &Value, from_key: &str) -> Result<Link, TrackerError> {
    let id = raw
        .get("id")
        .and_then(id_string)
        .ok_or_else(|| TrackerError::Decode("issue link without an id".to_string()))?;
    let link_type = str_at(raw, &["type", "name"])
        .ok_or_else(|| TrackerError::Decode(format!("issue link {id} without a type")))?;

    let outward_key = str_at(raw, &["outwardIssue", "key"]);
    let (direction, other) = if outward_key.as_deref() == Some(from_key) {
        (LinkDirection::Inward, raw.get("inwardIssue"))
    } else {
        (LinkDirection::Outward, raw.get("outwardIssue"))
    };
    let other = other.ok_or_else(|| {
        TrackerError::Decode(format!("issue link {id} has no side opposite {from_key}"))
    })?;

    Ok(Link {
        other_key: str_at(other, &["key"])
            .ok_or_else(|| TrackerError::Decode(format!("issue link {id} side without a key")))?,
        other_type: str_at(other, &["fields", "issuetype", "name"])
            .map(|n| IssueType::from_name(&n)),
        id,
        link_type,
        direction,
    })
}

pub fn decode_comments(raw: &Value) -> Vec<Comment> {
    raw.get("comments")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| {
                    Some(Comment {
                        author: str_at(c, &["author", "displayName"]),
                        body: str_at(c, &["body"])?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn decode_changelog(raw: &Value) -> Vec<ChangeItem> {
    let Some(histories) = raw.get("changelog").and_then(|c| c.get("histories")) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for history in histories.as_array().into_iter().flatten() {
        let created = str_at(history, &["created"]);
        for item in history.get("items").and_then(Value::as_array).into_iter().flatten() {
            let Some(field) = str_at(item, &["field"]) else {
                continue;
            };
            out.push(ChangeItem {
                field,
                from: str_at(item, &["fromString"]),
                to: str_at(item, &["toString"]),
                created: created.clone(),
            });
        }
    }
    out
}

fn decode_assignee(raw: Option<&Value>) -> Option<String> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            str_at(value, &["displayName"])
                .or_else(|| str_at(value, &["name"]))
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ASSIGNEE.to_string()),
        ),
    }
}

fn decode_sponsors(raw: Option<&Value>) -> Vec<String> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            other => str_at(other, &["value"]),
        })
        .collect()
}

fn decode_parent(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(key) if !key.is_empty() => Some(key.clone()),
        other => str_at(other, &["key"]),
    }
}

fn decode_lead_project(raw: Option<&Value>) -> Option<String> {
    let first = match raw? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first {
        Value::String(s) => Some(s.clone()),
        other => str_at(other, &["value"]).or_else(|| str_at(other, &["name"])),
    }
}

fn id_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    current.as_str().map(str::to_string)
}
