//! Deploy/undeploy orchestration
//!
//! Sequences upload, undeploy, cleanup, creation and activation for each
//! requested artifact. Operations run one after another; none is retried.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::deploy::lifecycle::DeploymentManager;
use crate::deploy::poller;
use crate::deploy::resolver::TargetResolver;
use crate::errors::DeployError;
use crate::http::api::MmcApi;
use crate::models::deployment::DeployRequest;

/// Deploy behaviour switches
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Activate the deployment and wait for it to settle
    pub complete_deployment: bool,

    /// Delete every existing deployment of the application on the target
    pub delete_old_deployments: bool,

    /// Activation budget; `None` waits without limit
    pub startup_timeout: Option<Duration>,

    /// Budget for each deletion to reach DELETED, rollback included
    pub delete_timeout: Duration,

    pub poller: poller::Options,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            complete_deployment: false,
            delete_old_deployments: false,
            startup_timeout: None,
            delete_timeout: Duration::from_secs(300),
            poller: poller::Options::default(),
        }
    }
}

/// Runs deploy requests against one console
pub struct Orchestrator<A: MmcApi + ?Sized> {
    api: Arc<A>,
    options: DeployOptions,
}

impl<A: MmcApi + ?Sized> Orchestrator<A> {
    pub fn new(api: Arc<A>, options: DeployOptions) -> Self {
        Self { api, options }
    }

    fn manager(&self) -> DeploymentManager<'_, A> {
        DeploymentManager::new(&*self.api, self.options.poller.clone())
    }

    /// Upload an artifact and make it the deployment named in the request
    ///
    /// Returns the id of the created deployment.
    pub async fn do_deploy(&self, request: &DeployRequest) -> Result<String, DeployError> {
        let artifact = &request.artifact;
        info!(
            "Deploying {} {} to {} as {}",
            artifact.name, artifact.version, request.target_name, request.deployment_name
        );

        let version_id = self.api.upload(artifact).await?;
        info!("Uploaded {} {} as version {}", artifact.name, artifact.version, version_id);

        let manager = self.manager();
        let delete_timeout = Some(self.options.delete_timeout);
        manager
            .delete_deployment_named(&request.deployment_name, delete_timeout)
            .await?;

        let target = TargetResolver::new(&*self.api).resolve(&request.target_name).await?;
        manager.undeploy_on(&artifact.name, &target).await?;

        if self.options.delete_old_deployments {
            manager
                .delete_deployments_on(&artifact.name, &target, delete_timeout)
                .await?;
        }

        let deployment_id = manager
            .create_deployment(&request.deployment_name, &target, &[version_id], delete_timeout)
            .await?;

        if self.options.complete_deployment {
            manager
                .activate_and_await(&deployment_id, self.options.startup_timeout)
                .await?;
        }

        info!("Deployed {} {} as {}", artifact.name, artifact.version, deployment_id);
        Ok(deployment_id)
    }

    /// Best-effort cleanup after a failed deploy
    ///
    /// Removes the deployment named in the request. Failures are logged,
    /// never returned.
    pub async fn do_undeploy(&self, request: &DeployRequest) {
        info!(
            "Undeployment starting ({} {} from {})",
            request.application_name(),
            request.artifact.version,
            request.target_name
        );

        let deleted = self
            .manager()
            .delete_deployment_named(&request.deployment_name, Some(self.options.delete_timeout))
            .await;
        match deleted {
            Ok(()) => info!("Undeployment finished"),
            Err(e) => warn!("Failed to delete deployment {}: {}", request.deployment_name, e),
        }
    }

    /// Delete every deployment of an application on a target
    pub async fn delete_deployments(&self, application_name: &str, target_name: &str) -> Result<(), DeployError> {
        self.manager()
            .delete_deployments_of(application_name, target_name, Some(self.options.delete_timeout))
            .await
    }

    /// Deploy every request in order
    ///
    /// A failed request is rolled back with [`do_undeploy`](Self::do_undeploy)
    /// and the remaining requests still run. Returns `true` only if at least
    /// one request was given and all of them succeeded.
    pub async fn perform(&self, requests: &[DeployRequest]) -> bool {
        if requests.is_empty() {
            error!("Nothing to deploy");
            return false;
        }

        let mut success = true;
        for request in requests {
            if let Err(e) = self.do_deploy(request).await {
                error!(
                    "Deployment of {} to {} failed: {}",
                    request.artifact.file.path().display(),
                    request.target_name,
                    e
                );
                self.do_undeploy(request).await;
                success = false;
            }
        }
        success
    }
}
