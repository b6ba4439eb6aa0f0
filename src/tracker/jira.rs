//! Jira REST v2 client (blocking)

use crate::domain::{ChangeItem, Comment, Config, FieldMap, Issue, Link, LinkRef};
use crate::tracker::decode::{decode_changelog, decode_comments, decode_issue, decode_link_detail};
use crate::tracker::{IssueQuery, IssueSource, RetryPolicy, TrackerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Value};
use std::time::Duration;

const USER_AGENT: &str = concat!("jiramap/", env!("CARGO_PKG_VERSION"));
const CAPTCHA_MARKER: &str = "CAPTCHA_CHALLENGE";
const ERROR_BODY_LIMIT: usize = 800;

pub struct JiraClient {
    agent: ureq::Agent,
    api_base: String,
    auth_header: String,
    fields: FieldMap,
    page_size: usize,
    retry: RetryPolicy,
}

impl JiraClient {
    pub fn new(server: &str, username: &str, secret: &str, config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api_base: format!("{}/rest/api/2", server.trim_end_matches('/')),
            auth_header: basic_auth_header(username, secret),
            fields: config.fields.clone(),
            page_size: config.page_size.max(1),
            retry: RetryPolicy::from_config(&config.retry),
        }
    }

    fn get_json(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
        subject: &str,
    ) -> Result<Value, TrackerError> {
        let url = format!("{}/{}", self.api_base, path);
        self.retry.run(operation, || {
            let mut request = self
                .agent
                .get(&url)
                .set("Authorization", &self.auth_header)
                .set("Accept", "application/json");
            for (name, value) in query {
                request = request.query(name, value);
            }
            let response = request.call().map_err(|e| map_error(e, subject))?;
            response.into_json::<Value>().map_err(|e| TrackerError::Decode(e.to_string()))
        })
    }

    fn put_json(
        &self,
        operation: &str,
        path: &str,
        body: &Value,
        subject: &str,
    ) -> Result<(), TrackerError> {
        let url = format!("{}/{}", self.api_base, path);
        self.retry.run(operation, || {
            self.agent
                .put(&url)
                .set("Authorization", &self.auth_header)
                .set("Accept", "application/json")
                .send_json(body)
                .map(|_| ())
                .map_err(|e| map_error(e, subject))
        })
    }
}

impl IssueSource for JiraClient {
    fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, TrackerError> {
        let jql = query.to_jql();
        tracing::debug!("JQL: {jql}");

        let page_size = self.page_size.to_string();
        let mut issues = Vec::new();
        let mut start_at = 0usize;
        loop {
            let start = start_at.to_string();
            let page = self.get_json(
                "search",
                "search",
                &[("jql", &jql), ("startAt", &start), ("maxResults", &page_size)],
                &jql,
            )?;
            let total = page.get("total").and_then(Value::as_u64).unwrap_or(0) as usize;
            let batch = page.get("issues").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
            for raw in batch {
                issues.push(decode_issue(raw, &self.fields)?);
            }
            start_at += batch.len();
            if batch.is_empty() || start_at >= total {
                break;
            }
        }
        tracing::debug!("JQL returned {} issues", issues.len());
        Ok(issues)
    }

    fn fetch(&self, key: &str) -> Result<Issue, TrackerError> {
        let raw = self.get_json("fetch issue", &format!("issue/{key}"), &[], key)?;
        decode_issue(&raw, &self.fields)
    }

    fn update(&self, key: &str, fields: &Map<String, Value>) -> Result<(), TrackerError> {
        let body = json!({ "fields": fields });
        self.put_json("update issue", &format!("issue/{key}"), &body, key)
    }

    fn link_detail(&self, link: &LinkRef) -> Result<Link, TrackerError> {
        let subject = format!("issue link {}", link.id);
        let raw = self.get_json("fetch link", &format!("issueLink/{}", link.id), &[], &subject)?;
        decode_link_detail(&raw, &link.from_key)
    }

    fn comments(&self, key: &str) -> Result<Vec<Comment>, TrackerError> {
        let raw = self.get_json("fetch comments", &format!("issue/{key}/comment"), &[], key)?;
        Ok(decode_comments(&raw))
    }

    fn changelog(&self, key: &str) -> Result<Vec<ChangeItem>, TrackerError> {
        let raw = self.get_json(
            "fetch changelog",
            &format!("issue/{key}"),
            &[("expand", "changelog"), ("fields", "summary")],
            key,
        )?;
        Ok(decode_changelog(&raw))
    }
}

fn basic_auth_header(username: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{secret}")))
}

fn map_error(err: ureq::Error, subject: &str) -> TrackerError {
    match err {
        ureq::Error::Status(status, response) => {
            let denied = response.header("X-Authentication-Denied-Reason").map(str::to_string);
            let body = response.into_string().unwrap_or_default();
            if denied.as_deref().is_some_and(|r| r.contains(CAPTCHA_MARKER))
                || body.contains(CAPTCHA_MARKER)
            {
                return TrackerError::CaptchaChallenge;
            }
            match status {
                401 => TrackerError::Unauthorized,
                404 => TrackerError::NotFound(subject.to_string()),
                _ => TrackerError::Http { status, body: truncate_for_error(&body, ERROR_BODY_LIMIT) },
            }
        }
        ureq::Error::Transport(transport) => TrackerError::Transport(transport.to_string()),
    }
}

fn truncate_for_error(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        return body.to_string();
    }
    let cut: String = body.chars().take(limit).collect();
    format!("{cut}...")
}
