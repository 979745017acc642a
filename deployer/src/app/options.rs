//! Job configuration options

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::deploy::orchestrator::DeployOptions;
use crate::deploy::poller;
use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::http::client::Credentials;
use crate::models::artifact::Artifact;
use crate::models::deployment::DeployRequest;
use crate::storage::settings::Settings;
use crate::utils::CooldownOptions;

/// Environment variable consulted when no password is configured
pub const PASSWORD_ENV: &str = "MMC_PASSWORD";

/// Validated options of one deploy job
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Console REST API base URL
    pub console_url: Url,

    pub credentials: Credentials,

    /// Directory the file location is resolved against
    pub workspace: PathBuf,

    /// Artifact path; `*` allowed in the file name
    pub file_location: String,

    pub application_name: String,

    pub artifact_version: String,

    /// Never blank; defaults to the application name
    pub deployment_name: String,

    /// Server, server group or cluster name
    pub target_name: String,

    pub deploy: DeployOptions,
}

impl JobOptions {
    /// Validate settings into job options
    ///
    /// `password_env` is the value of `MMC_PASSWORD`, used when the
    /// settings carry no password.
    pub fn from_settings(settings: &Settings, password_env: Option<String>) -> Result<Self, DeployError> {
        let console_url = Url::parse(settings.console.url.trim())?;

        let job = &settings.job;
        let application_name = required("application name", &job.application_name)?;
        let artifact_version = required("artifact version", &job.artifact_version)?;
        let target_name = required("target name", &job.target_name)?;
        let file_location = required("file location", &job.file_location)?;

        let deployment_name = match job.deployment_name.trim() {
            "" => application_name.clone(),
            name => name.to_string(),
        };

        let password = settings
            .console
            .password
            .clone()
            .or(password_env)
            .unwrap_or_default();

        let startup_timeout = if job.complete_deployment {
            parse_startup_timeout(&job.startup_timeout)?
        } else {
            None
        };

        Ok(Self {
            console_url,
            credentials: Credentials::new(settings.console.username.clone(), password),
            workspace: job.workspace.clone(),
            file_location,
            application_name,
            artifact_version,
            deployment_name,
            target_name,
            deploy: DeployOptions {
                complete_deployment: job.complete_deployment,
                delete_old_deployments: job.delete_old_deployments,
                startup_timeout,
                delete_timeout: Duration::from_millis(job.delete_timeout_ms),
                poller: poller::Options {
                    interval: Duration::from_millis(job.poll_interval_ms),
                    backoff: job.poll_backoff.then(|| CooldownOptions {
                        base_delay: Duration::from_millis(job.poll_interval_ms),
                        ..Default::default()
                    }),
                },
            },
        })
    }

    /// One deploy request per resolved artifact file
    pub fn requests(&self, files: Vec<File>) -> Vec<DeployRequest> {
        files
            .into_iter()
            .map(|file| DeployRequest {
                artifact: Artifact::new(self.application_name.clone(), self.artifact_version.clone(), file),
                target_name: self.target_name.clone(),
                deployment_name: self.deployment_name.clone(),
            })
            .collect()
    }
}

/// Parse a startup timeout given in milliseconds
///
/// Zero or negative values mean no deadline.
pub fn parse_startup_timeout(value: &str) -> Result<Option<Duration>, DeployError> {
    let millis: i64 = value
        .trim()
        .parse()
        .map_err(|_| DeployError::ConfigError(format!("Invalid startup timeout: {:?}", value)))?;

    if millis <= 0 {
        Ok(None)
    } else {
        Ok(Some(Duration::from_millis(millis as u64)))
    }
}

fn required(what: &str, value: &str) -> Result<String, DeployError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeployError::ConfigError(format!("Missing {}", what)));
    }
    Ok(value.to_string())
}
