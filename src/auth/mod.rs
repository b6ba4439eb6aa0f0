//! Credential resolution.
//!
//! Username: `JIRA_USERNAME`, then the config file, then a prompt (with an
//! offer to save it). Secret: `JIRA_PASSWORD`, then the config `auth_token`,
//! then a hidden prompt.

use crate::config::save_username;
use crate::domain::Config;
use anyhow::{bail, Context, Result};
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use std::path::Path;

pub const USERNAME_ENV: &str = "JIRA_USERNAME";
pub const PASSWORD_ENV: &str = "JIRA_PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("secret", &"***").finish()
    }
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EnvCredentials {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self { username: read(USERNAME_ENV), password: read(PASSWORD_ENV) }
    }
}

/// Interactive questions asked when nothing else provides a value.
pub trait Prompter {
    fn username(&self) -> Result<String>;
    fn confirm_save(&self, path: &Path) -> Result<bool>;
    fn password(&self) -> Result<String>;
}

/// Prompts on the terminal; refuses when stderr is not attended.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn ensure_interactive(what: &str) -> Result<()> {
        if !Term::stderr().features().is_attended() {
            bail!("No {what} available and not running interactively");
        }
        Ok(())
    }
}

impl Prompter for TerminalPrompter {
    fn username(&self) -> Result<String> {
        Self::ensure_interactive(&format!("username (set {USERNAME_ENV})"))?;
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Username (john.doe@foo.org)")
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn confirm_save(&self, path: &Path) -> Result<bool> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Username not found in {}, want to store it?", path.display()))
            .default(false)
            .interact()?;
        Ok(answer)
    }

    fn password(&self) -> Result<String> {
        Self::ensure_interactive(&format!("password (set {PASSWORD_ENV})"))?;
        let value = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;
        Ok(value)
    }
}

/// Resolve credentials. A prompted username is offered for saving to
/// `save_path`.
pub fn resolve_credentials(
    config: &Config,
    env: &EnvCredentials,
    save_path: Option<&Path>,
    prompter: &dyn Prompter,
) -> Result<Credentials> {
    let username = match env.username.clone().or_else(|| config.username.clone()) {
        Some(username) => username,
        None => {
            let username = prompter.username()?.trim().to_lowercase();
            if username.is_empty() {
                bail!("Empty username not allowed");
            }
            if let Some(path) = save_path {
                if prompter.confirm_save(path)? {
                    save_username(path, &username)
                        .with_context(|| format!("Failed to store username in {}", path.display()))?;
                }
            }
            username
        }
    };

    let secret = match env.password.clone().or_else(|| config.auth_token.clone()) {
        Some(secret) => secret,
        None => {
            tracing::debug!("{PASSWORD_ENV} not set and no auth token configured");
            let secret = prompter.password()?;
            if secret.is_empty() {
                bail!("{PASSWORD_ENV} not exported and an empty password was given");
            }
            secret
        }
    };

    Ok(Credentials { username, secret })
}
