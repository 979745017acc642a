//! Deployment lifecycle management
//!
//! Creates, replaces, activates, undeploys and deletes named deployments.
//! A deployment name is always freed (delete, then confirm) before a new
//! deployment is created under it.

use std::collections::BTreeSet;
use std::time::Duration;

use mmc_models::{CreateDeploymentRequest, DeploymentStatus};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::deploy::poller::{self, await_terminal, Ticker};
use crate::deploy::resolver::TargetResolver;
use crate::errors::DeployError;
use crate::http::api::MmcApi;
use crate::models::target::{DeploymentFilter, DeploymentTarget, LookupKind};

/// Drives deployments of one console through their lifecycle
pub struct DeploymentManager<'a, A: MmcApi + ?Sized> {
    api: &'a A,
    poller: poller::Options,
}

impl<'a, A: MmcApi + ?Sized> DeploymentManager<'a, A> {
    pub fn new(api: &'a A, poller: poller::Options) -> Self {
        Self { api, poller }
    }

    /// Ids of deployments of any version of `application_name` on `target_name`
    ///
    /// With `deployed_only` only deployments in DEPLOYED state are returned.
    pub async fn find_deployment_ids(
        &self,
        application_name: &str,
        target_name: &str,
        deployed_only: bool,
    ) -> Result<BTreeSet<String>, DeployError> {
        let target = TargetResolver::new(self.api).resolve(target_name).await?;
        self.find_deployment_ids_on(application_name, &target, deployed_only).await
    }

    /// Same as [`find_deployment_ids`](Self::find_deployment_ids) for a resolved target
    pub async fn find_deployment_ids_on(
        &self,
        application_name: &str,
        target: &DeploymentTarget,
        deployed_only: bool,
    ) -> Result<BTreeSet<String>, DeployError> {
        let Some(application_id) = self.api.lookup_id(LookupKind::Application, application_name).await? else {
            debug!("Application {} is not in the repository", application_name);
            return Ok(BTreeSet::new());
        };
        let version_ids = self.api.version_ids(&application_id).await?;

        let mut deployment_ids = BTreeSet::new();
        for filter in target.filters() {
            for deployment in self.api.deployments(&filter).await? {
                if deployed_only && deployment.status != DeploymentStatus::Deployed {
                    continue;
                }
                if deployment.applications.iter().any(|v| version_ids.contains(v)) {
                    deployment_ids.insert(deployment.id);
                }
            }
        }

        debug!(
            "Deployments of {} on {} (deployed only: {}) => {:?}",
            application_name,
            target.id(),
            deployed_only,
            deployment_ids
        );
        Ok(deployment_ids)
    }

    /// Undeploy every deployed version of an application from a target
    pub async fn undeploy(&self, application_name: &str, target_name: &str) -> Result<(), DeployError> {
        let target = TargetResolver::new(self.api).resolve(target_name).await?;
        self.undeploy_on(application_name, &target).await
    }

    /// Undeploy every deployed version of an application from a resolved target
    pub async fn undeploy_on(&self, application_name: &str, target: &DeploymentTarget) -> Result<(), DeployError> {
        info!("Undeploying {} from {}", application_name, target.id());

        for deployment_id in self.find_deployment_ids_on(application_name, target, true).await? {
            info!("Undeploying deployment {}", deployment_id);
            self.api.undeploy_deployment(&deployment_id).await?;
        }
        Ok(())
    }

    /// Delete every deployment of an application on a target, whatever its status
    pub async fn delete_deployments_of(
        &self,
        application_name: &str,
        target_name: &str,
        timeout: Option<Duration>,
    ) -> Result<(), DeployError> {
        let target = TargetResolver::new(self.api).resolve(target_name).await?;
        self.delete_deployments_on(application_name, &target, timeout).await
    }

    /// Delete every deployment of an application on a resolved target
    ///
    /// Each deletion must reach DELETED before the next one starts.
    pub async fn delete_deployments_on(
        &self,
        application_name: &str,
        target: &DeploymentTarget,
        timeout: Option<Duration>,
    ) -> Result<(), DeployError> {
        info!("Deleting deployments of {} on {}", application_name, target.id());

        for deployment_id in self.find_deployment_ids_on(application_name, target, false).await? {
            self.delete_and_confirm(&deployment_id, timeout).await?;
        }
        Ok(())
    }

    /// Id of the deployment with exactly this name
    pub async fn find_deployment_by_name(&self, name: &str) -> Result<Option<String>, DeployError> {
        let id = self
            .api
            .deployments(&DeploymentFilter::All)
            .await?
            .into_iter()
            .find(|d| d.name == name)
            .map(|d| d.id);

        debug!("Deployment named {} => {:?}", name, id);
        Ok(id)
    }

    /// Delete the deployment with this name, if any, waiting at most `timeout`
    pub async fn delete_deployment_named(&self, name: &str, timeout: Option<Duration>) -> Result<(), DeployError> {
        match self.find_deployment_by_name(name).await? {
            Some(deployment_id) => {
                info!("Deleting deployment {} ({})", name, deployment_id);
                self.delete_and_confirm(&deployment_id, timeout).await
            }
            None => Ok(()),
        }
    }

    async fn delete_and_confirm(&self, deployment_id: &str, timeout: Option<Duration>) -> Result<(), DeployError> {
        let started = Instant::now();
        self.api.delete_deployment_by_id(deployment_id).await?;

        let mut ticker = Ticker::new(self.poller.clone(), started, timeout);
        let status = await_terminal(self.api, deployment_id, &mut ticker).await?;
        if status != DeploymentStatus::Deleted {
            error!("Deployment {} did not delete, status {}", deployment_id, status);
            return Err(DeployError::DeletingFailed {
                id: deployment_id.to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Create a deployment named `name` binding `version_ids` to `target`
    ///
    /// Any existing deployment with the same name is deleted first, waiting
    /// at most `delete_timeout` for it to disappear.
    pub async fn create_deployment(
        &self,
        name: &str,
        target: &DeploymentTarget,
        version_ids: &[String],
        delete_timeout: Option<Duration>,
    ) -> Result<String, DeployError> {
        self.delete_deployment_named(name, delete_timeout).await?;

        let request = build_create_request(name, target, version_ids);
        debug!("Create deployment request {:?}", request);

        let deployment_id = self.api.create_deployment(&request).await?;
        info!("Created deployment {} ({}) on {}", name, deployment_id, target.id());
        Ok(deployment_id)
    }

    /// Trigger activation and wait for a terminal status
    ///
    /// FAILED is reported as `StartupFailed`; any other terminal status
    /// counts as success.
    pub async fn activate_and_await(
        &self,
        deployment_id: &str,
        timeout: Option<Duration>,
    ) -> Result<DeploymentStatus, DeployError> {
        let started = Instant::now();
        info!("Activating deployment {}", deployment_id);
        self.api.deploy_deployment(deployment_id).await?;

        let mut ticker = Ticker::new(self.poller.clone(), started, timeout);
        let status = await_terminal(self.api, deployment_id, &mut ticker).await?;
        if status == DeploymentStatus::Failed {
            error!("Startup of deployment {} failed", deployment_id);
            return Err(DeployError::StartupFailed(deployment_id.to_string()));
        }

        info!("Deployment {} finished with status {}", deployment_id, status);
        Ok(status)
    }
}

/// Build a creation request; servers and clusters are mutually exclusive
pub fn build_create_request(name: &str, target: &DeploymentTarget, version_ids: &[String]) -> CreateDeploymentRequest {
    let (servers, clusters) = match target {
        DeploymentTarget::Server { id } | DeploymentTarget::ServerGroup { id, .. } => (Some(vec![id.clone()]), None),
        DeploymentTarget::Cluster { id } => (None, Some(vec![id.clone()])),
    };

    CreateDeploymentRequest {
        name: name.to_string(),
        servers,
        clusters,
        applications: version_ids.to_vec(),
    }
}
