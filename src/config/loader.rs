//! Config file discovery, layering and username save-back

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked for in the working directory, in order.
pub const CONFIG_CANDIDATES: &[&str] =
    &["jiramap.yml", ".jiramap.yml", "jiramap.yaml", "jiramap.toml", "config.yml"];

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "JIRAMAP_";

/// Section name accepted as a wrapper around the settings.
const NESTED_SECTION: &str = "jiramap";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the settings came from, if any.
    pub path: Option<PathBuf>,
}

/// Load configuration: defaults, then the config file, then `JIRAMAP_*`
/// environment variables.
///
/// An explicitly given file must parse; an auto-discovered one that does not
/// is reported and skipped.
pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<LoadedConfig> {
    let config_path_provided = config_path.is_some();
    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(work_dir),
    };

    let mut file_layer = None;
    if let Some(config_file) = &discovered {
        match read_config_value(config_file) {
            Ok(value) => file_layer = Some(value),
            Err(e) if config_path_provided => return Err(e),
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", config_file.display(), e);
            }
        }
    }
    if let Some(config_file) = &discovered {
        tracing::debug!("Using config file: {}", config_file.display());
    }

    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(value) = file_layer {
        figment = figment.merge(Serialized::globals(value));
    }
    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Invalid configuration")?;

    Ok(LoadedConfig { config, path: discovered })
}

/// First config file found in `work_dir`, else the per-user one.
pub fn discover_config(work_dir: &Path) -> Option<PathBuf> {
    for candidate in CONFIG_CANDIDATES {
        let path = work_dir.join(candidate);
        if path.is_file() {
            return Some(path);
        }
    }
    user_config_path().filter(|p| p.is_file())
}

/// `<config dir>/jiramap/config.yml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jiramap").join("config.yml"))
}

/// Read a YAML or TOML file into a settings object, unwrapping a nested
/// `jiramap` section and validating it against [`Config`].
fn read_config_value(config_file: &Path) -> Result<Value> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let raw: Value = match extension(config_file).as_str() {
        "toml" => {
            let parsed: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;
            serde_json::to_value(parsed)?
        }
        "yaml" | "yml" => {
            let parsed: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;
            serde_json::to_value(parsed)
                .with_context(|| format!("Unsupported YAML content: {}", config_file.display()))?
        }
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    };

    let mut value = match raw {
        Value::Null => Value::Object(Default::default()),
        Value::Object(mut map) => match map.remove(NESTED_SECTION) {
            Some(nested @ Value::Object(_)) => nested,
            Some(other) => {
                map.insert(NESTED_SECTION.to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        _ => anyhow::bail!("Config file must contain a mapping: {}", config_file.display()),
    };

    if let Value::Object(map) = &mut value {
        if let Some(token) = map.remove("auth-token") {
            map.entry("auth_token").or_insert(token);
        }
    }

    serde_json::from_value::<Config>(value.clone())
        .with_context(|| format!("Invalid config: {}", config_file.display()))?;
    Ok(value)
}

fn extension(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase()
}

/// Store `username` in `path`, keeping every other key. The file is created
/// if needed; a nested `jiramap` section is updated in place.
pub fn save_username(path: &Path, username: &str) -> Result<()> {
    let existing = if path.is_file() {
        fs::read_to_string(path)
            .with_context(|| format!("Failed reading config file: {}", path.display()))?
    } else {
        String::new()
    };

    let updated = if extension(path) == "toml" {
        let mut doc: toml::Table = toml::from_str(&existing)
            .with_context(|| format!("Invalid TOML syntax: {}", path.display()))?;
        let entry = toml::Value::String(username.to_string());
        match doc.get_mut(NESTED_SECTION) {
            Some(toml::Value::Table(section)) => {
                section.insert("username".to_string(), entry);
            }
            _ => {
                doc.insert("username".to_string(), entry);
            }
        }
        toml::to_string(&doc)?
    } else {
        let mut doc: serde_yaml::Value = if existing.trim().is_empty() {
            serde_yaml::Value::Mapping(Default::default())
        } else {
            serde_yaml::from_str(&existing)
                .with_context(|| format!("Invalid YAML syntax: {}", path.display()))?
        };
        let nested = doc.get(NESTED_SECTION).is_some_and(serde_yaml::Value::is_mapping);
        let target = if nested { doc.get_mut(NESTED_SECTION) } else { Some(&mut doc) };
        let Some(serde_yaml::Value::Mapping(map)) = target else {
            anyhow::bail!("Config file must contain a mapping: {}", path.display());
        };
        map.insert("username".into(), username.into());
        serde_yaml::to_string(&doc)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating config directory: {}", parent.display()))?;
    }
    fs::write(path, updated).with_context(|| format!("Failed writing config file: {}", path.display()))?;
    tracing::info!("Saved username to {}", path.display());
    Ok(())
}
