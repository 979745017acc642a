//! Deployment API client

use mmc_models::{
    CreateDeploymentRequest, CreatedResponse, DeploymentStatus, DeploymentStatusResponse,
    DeploymentSummary, ListResponse,
};
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::errors::DeployError;
use crate::http::client::{check_status, MmcClient};
use crate::models::target::DeploymentFilter;

impl MmcClient {
    /// List deployments, optionally filtered by target
    pub async fn deployments(&self, filter: &DeploymentFilter) -> Result<Vec<DeploymentSummary>, DeployError> {
        let query: Vec<(&str, &str)> = filter.query().into_iter().collect();
        let response: ListResponse<DeploymentSummary> = self.get_json("/deployments", &query).await?;
        Ok(response.data)
    }

    /// Create a deployment and return its id
    pub async fn create_deployment(&self, request: &CreateDeploymentRequest) -> Result<String, DeployError> {
        let created: CreatedResponse = self.post_json("/deployments", request).await?;
        debug!("Created deployment {} => {}", request.name, created.id);
        Ok(created.id)
    }

    /// Delete a deployment by id
    pub async fn delete_deployment_by_id(&self, deployment_id: &str) -> Result<(), DeployError> {
        self.delete(&format!("/deployments/{}", deployment_id)).await
    }

    /// Trigger activation of a deployment
    pub async fn deploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError> {
        self.post_empty(&format!("/deployments/{}/deploy", deployment_id)).await
    }

    /// Trigger deactivation of a deployment, keeping its record
    pub async fn undeploy_deployment(&self, deployment_id: &str) -> Result<(), DeployError> {
        self.post_empty(&format!("/deployments/{}/undeploy", deployment_id)).await
    }

    /// Get the current status of a deployment
    ///
    /// A 404 means the deployment is gone and reads as `Deleted`.
    pub async fn deployment_status(&self, deployment_id: &str) -> Result<DeploymentStatus, DeployError> {
        let path = format!("/deployments/{}", deployment_id);
        let response = self.request(Method::GET, &path).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Deployment {} not found, treating as deleted", deployment_id);
            return Ok(DeploymentStatus::Deleted);
        }

        let response = check_status(response, &Method::GET, &path).await?;
        let body: DeploymentStatusResponse = response.json().await?;
        debug!("Deployment {} status {}", deployment_id, body.status);
        Ok(body.status)
    }
}
