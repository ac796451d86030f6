//! Slack Channel for LogWatcher
//!
//! Posts a single text message to a Slack incoming webhook. One attempt,
//! no retry; the raw response body is handed back to the caller.

use std::path::Path;

use logwatcher_core::ConfigError;
use logwatcher_core::ini::IniTables;
use logwatcher_core::path_utils;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

/// Config file read from the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "slack.ini";

/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV_VAR: &str = "SLACK_CONFIG";

const SECTION: &str = "slack";

#[derive(Debug, Error)]
pub enum SlackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The `[slack]` section of `slack.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    pub slack_url: String,
    pub security_token: String,
    pub content_type: String,
}

impl SlackConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&path_utils::config_path(CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_tables(&IniTables::load(path)?)
    }

    pub fn from_tables(tables: &IniTables) -> Result<Self, ConfigError> {
        let section = tables.require_section(SECTION)?;
        Ok(Self {
            slack_url: section.require("slack_url")?.trim().to_string(),
            security_token: section.require("security_token")?.trim().to_string(),
            content_type: section.require("content_type")?.trim().to_string(),
        })
    }

    /// The webhook endpoint: base URL followed directly by the token.
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.slack_url, self.security_token)
    }
}

#[derive(Clone)]
pub struct SlackChannel {
    config: SlackConfig,
    client: Client,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// Webhook body for a message.
    pub fn payload(message: &str) -> Value {
        json!({ "text": message })
    }

    /// Posts `message` and returns the response body, whatever the status.
    pub async fn send_message(&self, message: &str) -> Result<String, SlackError> {
        info!("Slack: posting {} byte message", message.len());

        let response = self
            .client
            .post(self.config.webhook_url())
            .header(CONTENT_TYPE, self.config.content_type.as_str())
            .json(&Self::payload(message))
            .send()
            .await?;

        info!("Slack: webhook answered {}", response.status());
        Ok(response.text().await?)
    }
}
