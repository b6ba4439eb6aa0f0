//! Structured issue queries.
//!
//! A query renders to JQL for the live tracker and can also be evaluated
//! directly against decoded issues for offline snapshots.

use crate::domain::{Issue, IssueType, TERMINAL_STATUSES_JQL};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Open,
    Terminal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueQuery {
    pub project: Option<String>,
    pub issue_types: Vec<IssueType>,
    pub status: StatusFilter,
    pub keys: Vec<String>,
    /// Only issues resolved on or after this date.
    pub resolved_since: Option<NaiveDate>,
    /// JQL field to sort by, descending.
    pub order_by_desc: Option<String>,
}

impl IssueQuery {
    pub fn project(project: &str) -> Self {
        Self { project: Some(project.to_string()), ..Self::default() }
    }

    pub fn with_types(mut self, types: &[IssueType]) -> Self {
        self.issue_types = types.to_vec();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = keys;
        self
    }

    pub fn resolved_since(mut self, date: NaiveDate) -> Self {
        self.resolved_since = Some(date);
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by_desc = Some(field.to_string());
        self
    }

    pub fn to_jql(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(project) = &self.project {
            clauses.push(format!("project = {project}"));
        }
        if !self.keys.is_empty() {
            clauses.push(format!("key in ({})", self.keys.join(", ")));
        }
        if !self.issue_types.is_empty() {
            let names: Vec<&str> = self.issue_types.iter().map(IssueType::name).collect();
            clauses.push(format!("issuetype in ({})", names.join(", ")));
        }
        match self.status {
            StatusFilter::Any => {}
            StatusFilter::Open => clauses.push(format!("status not in ({TERMINAL_STATUSES_JQL})")),
            StatusFilter::Terminal => clauses.push(format!("status in ({TERMINAL_STATUSES_JQL})")),
        }
        if let Some(date) = self.resolved_since {
            clauses.push(format!("resolved >= \"{}\"", date.format("%Y-%m-%d")));
        }

        let mut jql = clauses.join(" AND ");
        if let Some(field) = &self.order_by_desc {
            jql.push_str(&format!(" ORDER BY {field} DESC"));
        }
        jql
    }

    /// Evaluate the filter part of the query in memory.
    ///
    /// Project membership is taken from the key prefix. Resolution dates are
    /// not part of a decoded issue, so `resolved_since` is not evaluated here.
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(project) = &self.project {
            let prefix = issue.key.split('-').next().unwrap_or_default();
            if prefix != project {
                return false;
            }
        }
        if !self.keys.is_empty() && !self.keys.contains(&issue.key) {
            return false;
        }
        if !self.issue_types.is_empty() {
            let Some(issue_type) = &issue.issue_type else {
                return false;
            };
            if !self.issue_types.contains(issue_type) {
                return false;
            }
        }
        match self.status {
            StatusFilter::Any => true,
            StatusFilter::Open => !issue.is_terminal(),
            StatusFilter::Terminal => issue.is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_open_initiatives_jql() {
        let q = IssueQuery::project("SWG")
            .with_types(&[IssueType::Initiative])
            .with_status(StatusFilter::Open);
        assert_eq!(
            q.to_jql(),
            "project = SWG AND issuetype in (Initiative) AND status not in (Resolved, Closed)"
        );
    }

    #[test]
    fn renders_closed_report_jql() {
        let q = IssueQuery::project("SWG")
            .with_types(&[IssueType::Epic, IssueType::Initiative, IssueType::Story])
            .with_status(StatusFilter::Terminal)
            .resolved_since(NaiveDate::from_ymd_opt(2026, 9, 13).expect("date"))
            .order_by_desc("cf[10005]");
        assert_eq!(
            q.to_jql(),
            "project = SWG AND issuetype in (Epic, Initiative, Story) AND status in (Resolved, Closed) \
             AND resolved >= \"2026-09-13\" ORDER BY cf[10005] DESC"
        );
    }

    #[test]
    fn matches_project_type_and_status() {
        let q = IssueQuery::project("SWG")
            .with_types(&[IssueType::Epic])
            .with_status(StatusFilter::Open);
        assert!(q.matches(&Issue::new("SWG-12", IssueType::Epic, "To Do")));
        assert!(!q.matches(&Issue::new("SWG-13", IssueType::Epic, "Closed")));
        assert!(!q.matches(&Issue::new("KWG-12", IssueType::Epic, "To Do")));
        assert!(!q.matches(&Issue::new("SWG-14", IssueType::Story, "To Do")));
    }

    #[test]
    fn matches_explicit_keys() {
        let q = IssueQuery::project("SWG").with_keys(vec!["SWG-320".to_string()]);
        assert!(q.matches(&Issue::new("SWG-320", IssueType::Epic, "To Do")));
        assert!(!q.matches(&Issue::new("SWG-321", IssueType::Epic, "To Do")));
    }
}
