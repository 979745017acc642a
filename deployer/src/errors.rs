//! Error types for mmcdeploy

use std::time::Duration;

use mmc_models::DeploymentStatus;
use thiserror::Error;

/// Main error type for console operations and deployment workflows
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote operation failed with status {status}: {body}")]
    RemoteOperation { status: u16, body: String },

    #[error("No server, server group or cluster found having the name {0}")]
    TargetNotFound(String),

    #[error("Timeout after {0:?} waiting for a terminal status")]
    Timeout(Duration),

    #[error("Startup failed for deployment {0}")]
    StartupFailed(String),

    #[error("Deleting deployment {id} ended with status {status}")]
    DeletingFailed { id: String, status: DeploymentStatus },

    #[error("Polling cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DeployError {
    fn from(err: anyhow::Error) -> Self {
        DeployError::Internal(err.to_string())
    }
}
