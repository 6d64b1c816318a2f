//! REST client for the `jenkins.io/v1` resources

use crate::cluster::{ActivitySource, ApiError, FactStore};
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::fact::{Fact, ResourceReference, API_VERSION, SUBJECT_KIND};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const FACTS: &str = "facts";
const PIPELINE_ACTIVITIES: &str = "pipelineactivities";

/// Talks to the cluster API server over HTTPS
#[derive(Debug, Clone)]
pub struct KubeClient {
    config: ClusterConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineActivity {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    metadata: ActivityMeta,
}

#[derive(Debug, Deserialize)]
struct ActivityMeta {
    name: String,
    #[serde(default)]
    uid: String,
}

impl KubeClient {
    pub fn new(config: ClusterConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("jx-app-jacoco/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(ca_path) = &config.ca_cert {
            let pem = std::fs::read(ca_path)?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::Config(format!("invalid CA certificate '{}': {}", ca_path.display(), e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("unable to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    fn url(&self, resource: &str) -> String {
        format!(
            "{}/apis/{}/namespaces/{}/{}",
            self.config.api_server, API_VERSION, self.config.namespace, resource
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send `request`, turning any non-2xx status into an [`ApiError`]
    async fn execute(&self, request: reqwest::RequestBuilder) -> std::result::Result<reqwest::Response, ApiError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> std::result::Result<T, ApiError> {
        let response = self.execute(request).await?;
        let status = response.status();
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::new(Some(status.as_u16()), "", format!("unexpected response body: {}", e)))
    }
}

#[async_trait]
impl FactStore for KubeClient {
    async fn create_fact(&self, fact: &Fact) -> std::result::Result<Fact, ApiError> {
        let url = self.url(FACTS);
        debug!("POST {} ({})", url, fact.name());
        let response = self.execute(self.http.post(&url).json(fact)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(created_fact(fact, &body))
    }
}

/// The fact as echoed back by the server, or `submitted` when the reply
/// cannot be read as one
///
/// Only called once the server has accepted the fact.
fn created_fact(submitted: &Fact, body: &str) -> Fact {
    match serde_json::from_str(body) {
        Ok(created) => created,
        Err(e) => {
            warn!("unreadable reply for created fact '{}': {}", submitted.name(), e);
            submitted.clone()
        }
    }
}

#[async_trait]
impl ActivitySource for KubeClient {
    async fn pipeline_activity(&self, name: &str) -> std::result::Result<ResourceReference, ApiError> {
        let url = format!("{}/{}", self.url(PIPELINE_ACTIVITIES), name);
        debug!("GET {}", url);
        let activity: PipelineActivity = self.send(self.http.get(&url)).await?;
        Ok(ResourceReference {
            api_version: activity.api_version.unwrap_or_else(|| API_VERSION.to_string()),
            kind: activity.kind.unwrap_or_else(|| SUBJECT_KIND.to_string()),
            name: activity.metadata.name,
            uid: activity.metadata.uid,
        })
    }
}
