//! Console API trait
//!
//! The deployment engine only talks to the console through this trait, so
//! tests can drive it with an in-memory console.

use std::collections::BTreeSet;

use async_trait::async_trait;
use mmc_models::{CreateDeploymentRequest, DeploymentStatus, DeploymentSummary};

use crate::errors::DeployError;
use crate::http::client::MmcClient;
use crate::models::artifact::Artifact;
use crate::models::target::{DeploymentFilter, LookupKind};

/// Remote operations of the management console
#[async_trait]
pub trait MmcApi: Send + Sync {
    /// Look up the id of a named entity; `None` when absent
    async fn lookup_id(&self, kind: LookupKind, name: &str) -> Result<Option<String>, DeployError>;

    /// All version ids of an application
    async fn version_ids(&self, application_id: &str) -> Result<BTreeSet<String>, DeployError>;

    /// Ids of clusters belonging to a server group
    async fn clusters_of_group(&self, group_id: &str) -> Result<BTreeSet<String>, DeployError>;

    /// Upload an artifact, returning its version id
    async fn upload(&self, artifact: &Artifact) -> Result<String, DeployError>;

    /// Delete one (name, version) from the repository if present
    async fn delete_application(&self, name: &str, version: &str) -> Result<(), DeployError>;

    /// List deployments
    async fn deployments(&self, filter: &DeploymentFilter) -> Result<Vec<DeploymentSummary>, DeployError>;

    /// Create a deployment, returning its id
    async fn create_deployment(&self, request: &CreateDeploymentRequest) -> Result<String, DeployError>;

    /// Delete a deployment by id
    async fn delete_deployment_by_id(&self, deployment_id: &str) -> Result<(), DeployError>;

    /// Trigger activation
    async fn deploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError>;

    /// Trigger deactivation
    async fn undeploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError>;

    /// Current status; a missing deployment reads as `Deleted`
    async fn deployment_status(&self, deployment_id: &str) -> Result<DeploymentStatus, DeployError>;
}

#[async_trait]
impl MmcApi for MmcClient {
    async fn lookup_id(&self, kind: LookupKind, name: &str) -> Result<Option<String>, DeployError> {
        MmcClient::lookup_id(self, kind, name).await
    }

    async fn version_ids(&self, application_id: &str) -> Result<BTreeSet<String>, DeployError> {
        MmcClient::version_ids(self, application_id).await
    }

    async fn clusters_of_group(&self, group_id: &str) -> Result<BTreeSet<String>, DeployError> {
        MmcClient::clusters_of_group(self, group_id).await
    }

    async fn upload(&self, artifact: &Artifact) -> Result<String, DeployError> {
        MmcClient::upload(self, artifact).await
    }

    async fn delete_application(&self, name: &str, version: &str) -> Result<(), DeployError> {
        MmcClient::delete_application(self, name, version).await
    }

    async fn deployments(&self, filter: &DeploymentFilter) -> Result<Vec<DeploymentSummary>, DeployError> {
        MmcClient::deployments(self, filter).await
    }

    async fn create_deployment(&self, request: &CreateDeploymentRequest) -> Result<String, DeployError> {
        MmcClient::create_deployment(self, request).await
    }

    async fn delete_deployment_by_id(&self, deployment_id: &str) -> Result<(), DeployError> {
        MmcClient::delete_deployment_by_id(self, deployment_id).await
    }

    async fn deploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError> {
        MmcClient::deploy_deployment(self, deployment_id).await
    }

    async fn undeploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError> {
        MmcClient::undeploy_deployment(self, deployment_id).await
    }

    async fn deployment_status(&self, deployment_id: &str) -> Result<DeploymentStatus, DeployError> {
        MmcClient::deployment_status(self, deployment_id).await
    }
}
