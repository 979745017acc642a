//! Catalog lookups: names to console ids

use std::collections::BTreeSet;

use mmc_models::{Application, ApplicationVersion, Cluster, ListResponse, NamedEntity};
use tracing::debug;

use crate::errors::DeployError;
use crate::http::client::MmcClient;
use crate::models::target::LookupKind;

impl MmcClient {
    /// Look up the id of a named entity
    ///
    /// Matching is exact and case-sensitive; the first match wins. A missing
    /// entity is `Ok(None)`.
    pub async fn lookup_id(&self, kind: LookupKind, name: &str) -> Result<Option<String>, DeployError> {
        let id = match kind {
            LookupKind::Application => {
                let apps = self.applications().await?;
                first_match(apps.iter().map(|a| (&a.id, &a.name)), name)
            }
            LookupKind::Server => {
                let servers: ListResponse<NamedEntity> =
                    self.get_json("/servers", &[("name", name)]).await?;
                first_match(servers.data.iter().map(|s| (&s.id, &s.name)), name)
            }
            LookupKind::ServerGroup => {
                let groups: ListResponse<NamedEntity> =
                    self.get_json("/serverGroups", &[("name", name)]).await?;
                first_match(groups.data.iter().map(|g| (&g.id, &g.name)), name)
            }
            LookupKind::Cluster => {
                let clusters = self.clusters().await?;
                first_match(clusters.iter().map(|c| (&c.id, &c.name)), name)
            }
        };

        debug!("Lookup {} {} => {:?}", kind, name, id);
        Ok(id)
    }

    /// Get all version ids known for an application
    pub async fn version_ids(&self, application_id: &str) -> Result<BTreeSet<String>, DeployError> {
        let path = format!("/repository/{}", application_id);
        let versions: ListResponse<ApplicationVersion> = self.get_json(&path, &[]).await?;

        let ids: BTreeSet<String> = versions.data.into_iter().map(|v| v.id).collect();
        debug!("Versions of application {} => {:?}", application_id, ids);
        Ok(ids)
    }

    /// Get the id of one (name, version) pair from the repository
    pub async fn version_id(&self, name: &str, version: &str) -> Result<Option<String>, DeployError> {
        let id = self
            .applications()
            .await?
            .into_iter()
            .filter(|a| a.name == name)
            .flat_map(|a| a.versions)
            .find(|v| v.name == version)
            .map(|v| v.id);

        debug!("Version id of {} {} => {:?}", name, version, id);
        Ok(id)
    }

    /// Get the ids of clusters that belong to a server group
    pub async fn clusters_of_group(&self, group_id: &str) -> Result<BTreeSet<String>, DeployError> {
        let ids: BTreeSet<String> = self
            .clusters()
            .await?
            .into_iter()
            .filter(|c| c.group_ids.iter().any(|g| g == group_id))
            .map(|c| c.id)
            .collect();

        debug!("Clusters of group {} => {:?}", group_id, ids);
        Ok(ids)
    }

    async fn applications(&self) -> Result<Vec<Application>, DeployError> {
        let apps: ListResponse<Application> = self.get_json("/repository", &[]).await?;
        Ok(apps.data)
    }

    async fn clusters(&self) -> Result<Vec<Cluster>, DeployError> {
        let clusters: ListResponse<Cluster> = self.get_json("/clusters", &[]).await?;
        Ok(clusters.data)
    }
}

fn first_match<'a>(
    mut entries: impl Iterator<Item = (&'a String, &'a String)>,
    name: &str,
) -> Option<String> {
    entries
        .find(|(_, entry_name)| entry_name.as_str() == name)
        .map(|(id, _)| id.clone())
}
