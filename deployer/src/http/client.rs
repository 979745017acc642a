//! HTTP client implementation

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

use crate::errors::DeployError;

/// Console credentials, sent preemptively as HTTP Basic auth
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// HTTP client for the management console REST API
///
/// The underlying `reqwest::Client` (and its connection pool) is created
/// once by the caller and reused for every request.
pub struct MmcClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl MmcClient {
    /// Create a new console client with its own connection pool
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_client(client, base_url, credentials))
    }

    /// Create a console client on top of an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start an authenticated request
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        self.client.request(method, &url).basic_auth(
            &self.credentials.username,
            Some(self.credentials.password.expose_secret()),
        )
    }

    /// Make a GET request
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DeployError> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        let response = check_status(response, &Method::GET, path).await?;

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request with a JSON body
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = check_status(response, &Method::POST, path).await?;

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request without a body, ignoring the response body
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), DeployError> {
        let response = self.request(Method::POST, path).send().await?;
        check_status(response, &Method::POST, path).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub(crate) async fn delete(&self, path: &str) -> Result<(), DeployError> {
        let response = self.request(Method::DELETE, path).send().await?;
        check_status(response, &Method::DELETE, path).await?;
        Ok(())
    }

    /// Check that the console is reachable with the configured credentials
    pub async fn test_connection(&self) -> Result<(), DeployError> {
        let response = self.request(Method::GET, "/deployments").send().await?;
        check_status(response, &Method::GET, "/deployments").await?;
        info!("Connected to management console at {}", self.base_url);
        Ok(())
    }
}

/// Turn any non-2xx response into a `RemoteOperation` error
pub(crate) async fn check_status(
    response: Response,
    method: &Method,
    path: &str,
) -> Result<Response, DeployError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!("HTTP {} {} failed: {} - {}", method, path, status, body);
    Err(DeployError::RemoteOperation {
        status: status.as_u16(),
        body,
    })
}
