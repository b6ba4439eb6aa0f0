//! Issue tracker access (Jira REST, offline snapshots)
//!
//! Everything above this module talks to an [`IssueSource`]; whether the
//! issues come from a live server or a JSON snapshot is decided once by the
//! CLI.

use crate::domain::{ChangeItem, Comment, Issue, Link, LinkRef};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod decode;
pub mod jira;
pub mod memory;
pub mod query;
pub mod retry;

pub use jira::JiraClient;
pub use memory::MemorySource;
pub use query::{IssueQuery, StatusFilter};
pub use retry::RetryPolicy;

/// Failures reported by an issue source.
///
/// Any of these aborts the current run; recoverable conditions such as a
/// missing estimate are represented as `None` fields on [`Issue`] instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Authentication failed: the tracker returned 401 Unauthorized")]
    Unauthorized,

    #[error(
        "CAPTCHA verification has been triggered; log out of Jira in a web browser, \
         log back in entering the captcha, then re-run"
    )]
    CaptchaChallenge,

    #[error("Issue or link not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode tracker response: {0}")]
    Decode(String),
}

impl TrackerError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::Transport(_) => true,
            TrackerError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// The query/update primitives the tree builder and estimate tools rely on.
pub trait IssueSource {
    fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, TrackerError>;

    fn fetch(&self, key: &str) -> Result<Issue, TrackerError>;

    fn update(&self, key: &str, fields: &Map<String, Value>) -> Result<(), TrackerError>;

    /// Resolve a link reference to its full typed record, seen from
    /// `link.from_key`.
    fn link_detail(&self, link: &LinkRef) -> Result<Link, TrackerError>;

    fn comments(&self, key: &str) -> Result<Vec<Comment>, TrackerError>;

    fn changelog(&self, key: &str) -> Result<Vec<ChangeItem>, TrackerError>;
}
