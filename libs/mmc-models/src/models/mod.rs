//! API models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Envelope used by every listing endpoint of the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A server or server group, as returned by `/servers` and `/serverGroups`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
    pub name: String,
}

/// Cluster entry from `/clusters`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Server groups this cluster belongs to
    #[serde(rename = "groupIds", default)]
    pub group_ids: Vec<String>,
}

/// Application entry from `/repository`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub versions: Vec<ApplicationVersion>,
}

/// A single uploaded version of an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationVersion {
    pub id: String,
    /// Version label
    #[serde(default)]
    pub name: String,
}

/// Response body of a successful artifact upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "versionId")]
    pub version_id: String,
}

/// Deployment entry from `/deployments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "DeploymentStatus::unknown")]
    pub status: DeploymentStatus,
    #[serde(default)]
    pub servers: Vec<String>,
    #[serde(default)]
    pub clusters: Vec<String>,
    /// Application version ids bound to this deployment
    #[serde(default)]
    pub applications: Vec<String>,
}

/// Body of `POST /deployments`
///
/// `servers` and `clusters` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<String>>,
    pub applications: Vec<String>,
}

/// Response body carrying the id of a created resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Body of `GET /deployments/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatusResponse {
    #[serde(default = "DeploymentStatus::unknown")]
    pub status: DeploymentStatus,
}

/// Remote deployment status
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentStatus {
    InProgress,
    Deployed,
    Failed,
    Deleting,
    Deleted,
    Undeployed,
    /// Status lookup answered 404
    NotFound,
    Unknown(String),
}

impl DeploymentStatus {
    fn unknown() -> Self {
        DeploymentStatus::Unknown(String::new())
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::InProgress => "IN PROGRESS",
            DeploymentStatus::Deployed => "DEPLOYED",
            DeploymentStatus::Failed => "FAILED",
            DeploymentStatus::Deleting => "DELETING",
            DeploymentStatus::Deleted => "DELETED",
            DeploymentStatus::Undeployed => "UNDEPLOYED",
            DeploymentStatus::NotFound => "NOT_FOUND",
            DeploymentStatus::Unknown(s) => s,
        }
    }

    /// Whether polling can stop at this status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeploymentStatus::InProgress | DeploymentStatus::Deleting)
    }
}

impl std::str::FromStr for DeploymentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "IN PROGRESS" | "IN_PROGRESS" => DeploymentStatus::InProgress,
            "DEPLOYED" => DeploymentStatus::Deployed,
            "FAILED" => DeploymentStatus::Failed,
            "DELETING" => DeploymentStatus::Deleting,
            "DELETED" => DeploymentStatus::Deleted,
            "UNDEPLOYED" => DeploymentStatus::Undeployed,
            "NOT_FOUND" | "NOT FOUND" => DeploymentStatus::NotFound,
            other => DeploymentStatus::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
