//! Artifact repository client

use mmc_models::UploadResponse;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use crate::errors::DeployError;
use crate::http::client::{check_status, MmcClient};
use crate::models::artifact::Artifact;

impl MmcClient {
    /// Upload an artifact and return its application version id
    ///
    /// Snapshot versions replace any existing (name, version). A conflict on
    /// a release version reuses the version already in the repository.
    pub async fn upload(&self, artifact: &Artifact) -> Result<String, DeployError> {
        info!(
            "Uploading {} {} from {}",
            artifact.name,
            artifact.version,
            artifact.file.path().display()
        );

        if artifact.is_snapshot() {
            debug!("Snapshot version, deleting {} {} first", artifact.name, artifact.version);
            self.delete_application(&artifact.name, &artifact.version).await?;
        }

        let contents = artifact.file.read_bytes().await?;
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(artifact.file.file_name()))
            .text("name", artifact.name.clone())
            .text("version", artifact.version.clone());

        let response = self
            .request(Method::POST, "/repository")
            .multipart(form)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            warn!(
                "Artifact {} {} already exists, reusing the existing version",
                artifact.name, artifact.version
            );
            return self
                .version_id(&artifact.name, &artifact.version)
                .await?
                .ok_or_else(|| {
                    DeployError::NotFound(format!(
                        "version {} of {} after upload conflict",
                        artifact.version, artifact.name
                    ))
                });
        }

        let response = check_status(response, &Method::POST, "/repository").await?;
        let body: UploadResponse = response.json().await?;
        debug!("Uploaded {} {} => {}", artifact.name, artifact.version, body.version_id);
        Ok(body.version_id)
    }

    /// Delete one (name, version) from the repository; absent versions are ignored
    pub async fn delete_application(&self, name: &str, version: &str) -> Result<(), DeployError> {
        match self.version_id(name, version).await? {
            Some(version_id) => {
                info!("Deleting application version {} ({} {})", version_id, name, version);
                self.delete(&format!("/repository/{}", version_id)).await
            }
            None => {
                debug!("No version {} of {} to delete", version, name);
                Ok(())
            }
        }
    }
}
