//! Target name resolution

use tracing::{debug, info};

use crate::errors::DeployError;
use crate::http::api::MmcApi;
use crate::models::target::{DeploymentTarget, LookupKind};

/// Order in which a target name is tried; the first match wins
pub const RESOLUTION_ORDER: [LookupKind; 3] = [LookupKind::ServerGroup, LookupKind::Server, LookupKind::Cluster];

/// Resolves a target name into a server group, server or cluster
pub struct TargetResolver<'a, A: MmcApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: MmcApi + ?Sized> TargetResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolve `target_name`, trying kinds in `RESOLUTION_ORDER`
    pub async fn resolve(&self, target_name: &str) -> Result<DeploymentTarget, DeployError> {
        for kind in RESOLUTION_ORDER {
            let Some(id) = self.api.lookup_id(kind, target_name).await? else {
                continue;
            };

            let target = match kind {
                LookupKind::ServerGroup => {
                    let cluster_ids = self.api.clusters_of_group(&id).await?;
                    debug!("Server group {} contains clusters {:?}", id, cluster_ids);
                    DeploymentTarget::ServerGroup { id, cluster_ids }
                }
                LookupKind::Cluster => DeploymentTarget::Cluster { id },
                LookupKind::Server | LookupKind::Application => DeploymentTarget::Server { id },
            };

            info!("Target {} resolved to {} {}", target_name, kind, target.id());
            return Ok(target);
        }

        Err(DeployError::TargetNotFound(target_name.to_string()))
    }
}
