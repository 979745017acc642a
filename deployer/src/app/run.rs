//! Main application run

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::JobOptions;
use crate::deploy::orchestrator::Orchestrator;
use crate::errors::DeployError;
use crate::filesys::artifacts::resolve_artifacts;
use crate::http::api::MmcApi;
use crate::http::client::MmcClient;

/// Run a deploy job against the configured console
///
/// Returns `Ok(true)` when every artifact was deployed. Artifact
/// resolution failures and a shutdown signal are returned as errors.
pub async fn run(
    job: JobOptions,
    shutdown_signal: impl Future<Output = ()> + Send,
) -> Result<bool, DeployError> {
    let client = MmcClient::new(job.console_url.as_str(), job.credentials.clone())?;
    run_with(Arc::new(client), job, shutdown_signal).await
}

/// Run a deploy job against any console API
pub async fn run_with<A: MmcApi + ?Sized>(
    api: Arc<A>,
    job: JobOptions,
    shutdown_signal: impl Future<Output = ()> + Send,
) -> Result<bool, DeployError> {
    info!(
        "Deploying {} {} from {} to {}",
        job.application_name, job.artifact_version, job.file_location, job.target_name
    );

    let files = resolve_artifacts(&job.workspace, &job.file_location).await?;
    for file in &files {
        info!("Found artifact {}", file.path().display());
    }

    let requests = job.requests(files);
    let orchestrator = Orchestrator::new(api, job.deploy.clone());

    tokio::select! {
        success = orchestrator.perform(&requests) => {
            if success {
                info!("Deployment finished");
            } else {
                error!("Deployment failed");
            }
            Ok(success)
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received, aborting deployment...");
            Err(DeployError::Cancelled)
        }
    }
}

/// Check the console URL and credentials without deploying anything
pub async fn test_connection(job: &JobOptions) -> Result<(), DeployError> {
    let client = MmcClient::new(job.console_url.as_str(), job.credentials.clone())?;
    client.test_connection().await
}
