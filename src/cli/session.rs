//! Per-invocation setup: configuration, credentials and the issue source.

use crate::auth::{resolve_credentials, EnvCredentials, TerminalPrompter};
use crate::config::{load_config, user_config_path};
use crate::domain::Config;
use crate::tracker::{IssueSource, JiraClient, MemorySource};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Options shared by every tracker-backed command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (YAML or TOML); discovered automatically when omitted
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Use the test server
    #[arg(short = 't', long, global = true)]
    pub test_server: bool,

    /// Tracker base URL, overriding the configured server
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Read issues from a JSON snapshot instead of the tracker
    #[arg(long, value_name = "FILE", global = true)]
    pub snapshot: Option<PathBuf>,
}

pub struct Session {
    pub config: Config,
    /// Base URL used for links in the output.
    pub server: String,
    source: Box<dyn IssueSource>,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let work_dir = std::env::current_dir().context("Failed to resolve the working directory")?;
        let loaded = load_config(&work_dir, global.config.as_deref())?;
        let config = loaded.config;
        let server = match &global.server {
            Some(server) => server.trim_end_matches('/').to_string(),
            None => config.server_url(global.test_server).to_string(),
        };

        let source: Box<dyn IssueSource> = match &global.snapshot {
            Some(path) => {
                tracing::debug!("Reading issues from snapshot {}", path.display());
                Box::new(MemorySource::load(path, &config.fields)?)
            }
            None => {
                let save_path = loaded.path.clone().or_else(user_config_path);
                let credentials = resolve_credentials(
                    &config,
                    &EnvCredentials::from_env(),
                    save_path.as_deref(),
                    &TerminalPrompter,
                )?;
                tracing::debug!("Connecting to {} as {}", server, credentials.username);
                Box::new(JiraClient::new(&server, &credentials.username, &credentials.secret, &config))
            }
        };

        Ok(Self { config, server, source })
    }

    pub fn source(&self) -> &dyn IssueSource {
        self.source.as_ref()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project key (SWG, KWG, ...)
    #[arg(short, long, default_value = "SWG", value_parser = super::utils::parse_project_key)]
    pub project: String,
}
