//! Deployment target models

use std::collections::BTreeSet;
use std::fmt;

/// Kind of named entity the console can look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Application,
    Server,
    ServerGroup,
    Cluster,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LookupKind::Application => "application",
            LookupKind::Server => "server",
            LookupKind::ServerGroup => "server group",
            LookupKind::Cluster => "cluster",
        };
        f.write_str(s)
    }
}

/// A resolved topology object a deployment can be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentTarget {
    Server {
        id: String,
    },
    ServerGroup {
        id: String,
        /// Clusters whose group membership includes this group
        cluster_ids: BTreeSet<String>,
    },
    Cluster {
        id: String,
    },
}

impl DeploymentTarget {
    pub fn id(&self) -> &str {
        match self {
            DeploymentTarget::Server { id }
            | DeploymentTarget::ServerGroup { id, .. }
            | DeploymentTarget::Cluster { id } => id,
        }
    }

    /// Listing filters covering every deployment bound to this target
    pub fn filters(&self) -> Vec<DeploymentFilter> {
        match self {
            DeploymentTarget::Server { id } => vec![DeploymentFilter::Server(id.clone())],
            DeploymentTarget::ServerGroup { id, cluster_ids } => {
                let mut filters = vec![DeploymentFilter::Server(id.clone())];
                filters.extend(cluster_ids.iter().cloned().map(DeploymentFilter::Cluster));
                filters
            }
            DeploymentTarget::Cluster { id } => vec![DeploymentFilter::Cluster(id.clone())],
        }
    }
}

/// Filter for `GET /deployments`
///
/// Server groups are queried through the `server` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentFilter {
    All,
    Server(String),
    Cluster(String),
}

impl DeploymentFilter {
    /// Query parameter for this filter, if any
    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            DeploymentFilter::All => None,
            DeploymentFilter::Server(id) => Some(("server", id)),
            DeploymentFilter::Cluster(id) => Some(("cluster", id)),
        }
    }
}
