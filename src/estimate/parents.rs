//! Initiative discovery for Epics (and other issues) through their outward
//! structural links, without building the full tree.

use crate::domain::{Issue, IssueType, LinkDirection};
use crate::tracker::IssueSource;
use crate::tree::ParentConflict;
use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, error};

/// Issues grouped under the Initiative they implement, in first-seen order.
#[derive(Debug, Default)]
pub struct InitiativeGroups {
    order: Vec<String>,
    members: HashMap<String, Vec<Issue>>,
    /// Issues that named more than one Initiative.
    pub conflicts: Vec<ParentConflict>,
    /// Keys of issues with no Initiative parent.
    pub without_parent: Vec<String>,
}

impl InitiativeGroups {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Issue])> {
        self.order.iter().map(|key| {
            let members = self.members.get(key).map(Vec::as_slice).unwrap_or(&[]);
            (key.as_str(), members)
        })
    }

    pub fn get(&self, initiative: &str) -> Option<&[Issue]> {
        self.members.get(initiative).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, initiative: String, issue: Issue) {
        if !self.members.contains_key(&initiative) {
            self.order.push(initiative.clone());
        }
        self.members.entry(initiative).or_default().push(issue);
    }
}

/// Initiatives `issue` implements, in link order and without duplicates.
///
/// Link targets whose type is not embedded in the issue are resolved through
/// [`IssueSource::link_detail`].
pub fn find_parent_initiatives(
    source: &dyn IssueSource,
    issue: &Issue,
    structural_link: &str,
) -> Result<Vec<String>> {
    let mut parents: Vec<String> = Vec::new();
    for link in issue.links_of(structural_link, LinkDirection::Outward) {
        let (other_key, other_type) = match &link.other_type {
            Some(t) => (link.other_key.clone(), Some(t.clone())),
            None => {
                let detail = source
                    .link_detail(&link.to_link_ref(&issue.key))
                    .with_context(|| format!("Failed to resolve link {} of {}", link.id, issue.key))?;
                (detail.other_key, detail.other_type)
            }
        };
        if other_type != Some(IssueType::Initiative) {
            continue;
        }
        if !parents.contains(&other_key) {
            debug!("{} implements {}", issue.key, other_key);
            parents.push(other_key);
        }
    }
    Ok(parents)
}

/// Group `issues` by Initiative parent. The first parent found wins; any
/// further parent is logged as an error and recorded as a conflict, so each
/// issue lands in at most one group.
pub fn group_by_initiative(
    source: &dyn IssueSource,
    issues: Vec<Issue>,
    structural_link: &str,
) -> Result<InitiativeGroups> {
    let mut groups = InitiativeGroups::default();
    for issue in issues {
        let parents = find_parent_initiatives(source, &issue, structural_link)?;
        let mut candidates = parents.into_iter();
        let Some(kept) = candidates.next() else {
            debug!("{} has no initiative parent", issue.key);
            groups.without_parent.push(issue.key);
            continue;
        };
        for ignored in candidates {
            error!("{} has more than one parent: keeping {}, ignoring {}", issue.key, kept, ignored);
            groups.conflicts.push(ParentConflict {
                child: issue.key.clone(),
                kept_parent: kept.clone(),
                ignored_parent: ignored,
            });
        }
        groups.push(kept, issue);
    }
    Ok(groups)
}
