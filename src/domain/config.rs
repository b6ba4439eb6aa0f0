//! Configuration schema.

use serde::{Deserialize, Serialize};

pub const PRODUCTION_SERVER: &str = "https://projects.linaro.org";
pub const TEST_SERVER: &str = "https://dev-projects.linaro.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub test_server: String,
    pub username: Option<String>,
    #[serde(alias = "auth-token")]
    pub auth_token: Option<String>,
    pub fields: FieldMap,
    /// Link type that expresses Initiative → Epic → Story containment.
    pub structural_link: String,
    pub next_cycle_label: String,
    pub page_size: usize,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
    /// Fix versions that do not count as churn in `stats`.
    pub ignored_fix_versions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: PRODUCTION_SERVER.to_string(),
            test_server: TEST_SERVER.to_string(),
            username: None,
            auth_token: None,
            fields: FieldMap::default(),
            structural_link: "Implements".to_string(),
            next_cycle_label: "NEXT-CYCLE".to_string(),
            page_size: 100,
            timeout_secs: 30,
            retry: RetryConfig::default(),
            ignored_fix_versions: vec!["NEXT-CYCLE".to_string(), "SAN19".to_string()],
        }
    }
}

impl Config {
    pub fn server_url(&self, use_test_server: bool) -> &str {
        let url = if use_test_server { &self.test_server } else { &self.server };
        url.trim_end_matches('/')
    }
}

/// Tracker custom field ids used to fill the optional parts of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub sponsors: String,
    pub parent: String,
    pub fte_next_cycle: String,
    pub fte_remaining: String,
    pub lead_project: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            sponsors: "customfield_10101".to_string(),
            parent: "customfield_10005".to_string(),
            fte_next_cycle: "customfield_11801".to_string(),
            fte_remaining: "customfield_12000".to_string(),
            lead_project: "customfield_10043".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: usize,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { attempts: 3, base_delay_ms: 500 }
    }
}
