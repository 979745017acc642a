//! Deployment models

use crate::models::artifact::Artifact;

/// One artifact to deploy to one target under a deployment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Artifact to upload
    pub artifact: Artifact,

    /// Server, server group or cluster name
    pub target_name: String,

    /// Name of the deployment in the console
    pub deployment_name: String,
}

impl DeployRequest {
    /// Application name (the artifact's repository name)
    pub fn application_name(&self) -> &str {
        &self.artifact.name
    }
}
