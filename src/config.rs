//! Cluster connection settings

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Mount point of the pod's service account credentials
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
pub const DEFAULT_NAMESPACE: &str = "jx";

/// Where and how to reach the cluster API
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Base URL of the API server
    pub api_server: String,
    /// Namespace holding facts and pipeline activities
    pub namespace: String,
    /// Bearer token
    pub token: Option<String>,
    /// PEM file with the API server's CA certificate
    pub ca_cert: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClusterConfig {
    pub fn new(api_server: &str, namespace: &str) -> Self {
        Self {
            api_server: api_server.trim_end_matches('/').to_string(),
            namespace: namespace.to_string(),
            token: None,
            ca_cert: None,
            timeout_secs: 30,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Settings from the environment and the in-cluster service account
    pub fn from_env(namespace: Option<String>) -> Result<Self> {
        Self::resolve(
            |key| std::env::var(key).ok(),
            Path::new(SERVICE_ACCOUNT_DIR),
            namespace,
        )
    }

    /// Resolve settings, preferring explicit values over the service account
    ///
    /// * API server: `KUBERNETES_API_SERVER`, else
    ///   `https://$KUBERNETES_SERVICE_HOST:$KUBERNETES_SERVICE_PORT`
    /// * Token: `KUBERNETES_TOKEN`, else `<sa_dir>/token`
    /// * Namespace: `namespace`, `JX_NAMESPACE`, `<sa_dir>/namespace`, `jx`
    /// * CA: `KUBERNETES_CA_CERT`, else `<sa_dir>/ca.crt` when present
    pub fn resolve<F>(lookup: F, sa_dir: &Path, namespace: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_server = lookup("KUBERNETES_API_SERVER")
            .or_else(|| {
                let host = lookup("KUBERNETES_SERVICE_HOST")?;
                let port = lookup("KUBERNETES_SERVICE_PORT").unwrap_or_else(|| "443".to_string());
                Some(format!("https://{}:{}", host, port))
            })
            .ok_or_else(|| {
                Error::Config(
                    "no cluster API server, set KUBERNETES_API_SERVER or run inside the cluster".to_string(),
                )
            })?;

        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .or_else(|| lookup("JX_NAMESPACE"))
            .or_else(|| read_trimmed(&sa_dir.join("namespace")))
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let mut config = Self::new(&api_server, &namespace);
        config.token = lookup("KUBERNETES_TOKEN").or_else(|| read_trimmed(&sa_dir.join("token")));
        config.ca_cert = lookup("KUBERNETES_CA_CERT").map(PathBuf::from).or_else(|| {
            let ca = sa_dir.join("ca.crt");
            ca.exists().then_some(ca)
        });
        Ok(config)
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
