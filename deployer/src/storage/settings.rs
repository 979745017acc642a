//! Settings file management

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Deployer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional log file, written next to stdout
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Management console connection
    #[serde(default)]
    pub console: ConsoleSettings,

    /// What to deploy and where
    #[serde(default)]
    pub job: JobSettings,
}

/// Management console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Base URL of the console REST API
    #[serde(default = "default_console_url")]
    pub url: String,

    #[serde(default)]
    pub username: String,

    /// Falls back to `MMC_PASSWORD` when absent
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

fn default_console_url() -> String {
    "http://localhost:8585/mmc-console/api".to_string()
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            url: default_console_url(),
            username: String::new(),
            password: None,
        }
    }
}

/// Deploy job settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSettings {
    /// Artifact path relative to the workspace; `*` allowed in the file name
    #[serde(default)]
    pub file_location: String,

    #[serde(default)]
    pub application_name: String,

    #[serde(default)]
    pub artifact_version: String,

    /// Defaults to the application name when blank
    #[serde(default)]
    pub deployment_name: String,

    /// Server, server group or cluster name
    #[serde(default)]
    pub target_name: String,

    #[serde(default)]
    pub complete_deployment: bool,

    #[serde(default)]
    pub delete_old_deployments: bool,

    /// Activation timeout in milliseconds; zero or negative waits forever
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout: String,

    /// Base directory for `file_location`
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Delay between status checks in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Grow the status check delay exponentially
    #[serde(default)]
    pub poll_backoff: bool,

    /// Longest wait for a deleted deployment to disappear, in milliseconds
    #[serde(default = "default_delete_timeout")]
    pub delete_timeout_ms: u64,
}

fn default_startup_timeout() -> String {
    "0".to_string()
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_poll_interval() -> u64 {
    50
}

fn default_delete_timeout() -> u64 {
    300_000
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            file_location: String::new(),
            application_name: String::new(),
            artifact_version: String::new(),
            deployment_name: String::new(),
            target_name: String::new(),
            complete_deployment: false,
            delete_old_deployments: false,
            startup_timeout: default_startup_timeout(),
            workspace: default_workspace(),
            poll_interval_ms: default_poll_interval(),
            poll_backoff: false,
            delete_timeout_ms: default_delete_timeout(),
        }
    }
}

impl Settings {
    /// Override settings with `--key=value` command line arguments
    ///
    /// Unknown keys are ignored; boolean flags accept `true`/`false`.
    pub fn apply_args(&mut self, args: &HashMap<String, String>) -> Result<(), DeployError> {
        for (key, value) in args {
            match key.as_str() {
                "log-level" => self.log_level = parse_log_level(value)?,
                "log-file" => self.log_file = Some(PathBuf::from(value)),
                "json-logs" => self.json_logs = parse_bool(key, value)?,
                "url" => self.console.url = value.clone(),
                "username" => self.console.username = value.clone(),
                "password" => self.console.password = Some(value.clone()),
                "file" => self.job.file_location = value.clone(),
                "application" => self.job.application_name = value.clone(),
                "artifact-version" => self.job.artifact_version = value.clone(),
                "deployment" => self.job.deployment_name = value.clone(),
                "target" => self.job.target_name = value.clone(),
                "complete-deployment" => self.job.complete_deployment = parse_bool(key, value)?,
                "delete-old-deployments" => self.job.delete_old_deployments = parse_bool(key, value)?,
                "startup-timeout" => self.job.startup_timeout = value.clone(),
                "workspace" => self.job.workspace = PathBuf::from(value),
                "poll-interval" => {
                    self.job.poll_interval_ms = value.parse().map_err(|_| {
                        DeployError::ConfigError(format!("--poll-interval expects milliseconds, got {}", value))
                    })?
                }
                "poll-backoff" => self.job.poll_backoff = parse_bool(key, value)?,
                "delete-timeout" => {
                    self.job.delete_timeout_ms = value.parse().map_err(|_| {
                        DeployError::ConfigError(format!("--delete-timeout expects milliseconds, got {}", value))
                    })?
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Load settings from a JSON file
pub async fn load_settings(file: &File) -> Result<Settings, DeployError> {
    let settings = file
        .read_json::<Settings>()
        .await
        .map_err(anyhow::Error::from)
        .with_context(|| format!("Unable to read settings file {}", file.path().display()))?;
    Ok(settings)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DeployError> {
    value
        .parse::<bool>()
        .map_err(|_| DeployError::ConfigError(format!("--{} expects true or false, got {}", key, value)))
}

fn parse_log_level(value: &str) -> Result<LogLevel, DeployError> {
    value.parse::<LogLevel>().map_err(DeployError::ConfigError)
}
