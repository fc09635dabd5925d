use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "issue-mirror.yaml";

/// Prefix of structured environment overrides (`ISSUE_MIRROR_NOTION__TOKEN`)
pub const ENV_PREFIX: &str = "ISSUE_MIRROR_";

/// Keys whose values are free-form text (tokens, ids, paths).
const STRING_KEYS: [&str; 11] = [
    "server.host",
    "server.path",
    "server.webhook_secret",
    "notion.token",
    "notion.issues_database_id",
    "notion.users_database_id",
    "notion.projects_database_id",
    "notion.base_url",
    "notion.version",
    "logging.level",
    "logging.log_dir",
];

fn is_string_key(key: &str) -> bool {
    STRING_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Notion token is not set (NOTION_TOKEN or notion.token)")]
    MissingNotionToken,

    #[error("Notion database id is not set: notion.{0}")]
    MissingDatabaseId(&'static str),

    #[error("Invalid Notion base_url: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid webhook path: {0}. Must start with '/' and must not be /health")]
    InvalidWebhookPath(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `issue-mirror.yaml` in the working directory (optional)
    /// 3. `ISSUE_MIRROR_*` environment variables, `__` separating sections
    /// 4. `NOTION_TOKEN`, `NOTION_*_DB_ID`, `GITHUB_WEBHOOK_SECRET`, `PORT`
    pub fn load() -> Result<Config> {
        let config = Self::extract(Self::figment(Path::new(DEFAULT_CONFIG_FILE)))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, with environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let config = Self::extract(Self::figment(path))
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load without validating, for callers that check a subset themselves
    pub fn load_unvalidated(path: Option<&Path>) -> Result<Config> {
        Self::extract(Self::figment(path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE))))
    }

    fn figment(file: &Path) -> Figment {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file));
        let figment = Self::merge_env(figment, Env::prefixed(ENV_PREFIX).split("__"));
        Self::merge_env(figment, Self::conventional_env())
    }

    /// Merge `env`, passing values of string-typed keys through verbatim.
    ///
    /// The `Env` provider parses `123456` as an integer and `true` as a
    /// boolean, which a `String` field then rejects.
    fn merge_env(figment: Figment, env: Env) -> Figment {
        let verbatim: Vec<(String, String)> = env
            .iter()
            .filter(|(key, _)| is_string_key(key.as_str()))
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
            .collect();

        let figment = figment.merge(env.filter(|key| !is_string_key(key.as_str())));
        verbatim
            .into_iter()
            .fold(figment, |figment, (key, value)| {
                figment.merge(Serialized::default(&key, value))
            })
    }

    fn extract(figment: Figment) -> Result<Config> {
        figment
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// The variable names used by existing deployments of the webhook
    fn conventional_env() -> Env {
        Env::raw().filter_map(|key| {
            let mapped = match key.as_str().to_ascii_uppercase().as_str() {
                "NOTION_TOKEN" => "notion.token",
                "NOTION_ISSUES_DB_ID" => "notion.issues_database_id",
                "NOTION_USERS_DB_ID" => "notion.users_database_id",
                "NOTION_PROJECTS_DB_ID" => "notion.projects_database_id",
                "GITHUB_WEBHOOK_SECRET" => "server.webhook_secret",
                "PORT" => "server.port",
                _ => return None,
            };
            Some(mapped.into())
        })
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let notion = &config.notion;
        if notion.token.trim().is_empty() {
            return Err(ConfigError::MissingNotionToken);
        }

        let databases = [
            ("issues_database_id", &notion.issues_database_id),
            ("users_database_id", &notion.users_database_id),
            ("projects_database_id", &notion.projects_database_id),
        ];
        for (name, id) in databases {
            if id.trim().is_empty() {
                return Err(ConfigError::MissingDatabaseId(name));
            }
        }

        if !(notion.base_url.starts_with("http://") || notion.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(notion.base_url.clone()));
        }

        Self::validate_local(config)
    }

    /// Validate everything except the Notion credentials
    pub fn validate_local(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let path = &config.server.path;
        if !path.starts_with('/') || path == "/health" {
            return Err(ConfigError::InvalidWebhookPath(path.clone()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
