//! Core data types shared across the crate.

pub mod config;
pub mod issue;
pub mod key;

pub use config::{Config, FieldMap, RetryConfig};
pub use issue::{
    is_terminal_status, ChangeItem, Comment, Issue, IssueType, Link, LinkDirection, LinkRef,
    TERMINAL_STATUSES_JQL,
};
pub use key::{is_issue_key, is_project_key, natural_cmp};
