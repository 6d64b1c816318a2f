//! Access to the Jenkins X custom resources in the cluster

pub mod client;
pub mod memory;

use crate::fact::{Fact, ResourceReference};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use client::KubeClient;
pub use memory::InMemoryCluster;

/// Status reason the API server reports for duplicate resource names
pub const REASON_ALREADY_EXISTS: &str = "AlreadyExists";
pub const REASON_NOT_FOUND: &str = "NotFound";

const TRANSIENT_REASONS: [&str; 5] = [
    "ServerTimeout",
    "Timeout",
    "TooManyRequests",
    "InternalError",
    "ServiceUnavailable",
];

/// Error returned by the cluster API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (reason: {reason}, status: {status:?})")]
pub struct ApiError {
    /// HTTP status, `None` when no response was received
    pub status: Option<u16>,
    /// Machine readable reason of the API server's `Status` object
    pub reason: String,
    pub message: String,
}

/// `Status` object returned with failed API calls
#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
    #[serde(default)]
    reason: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// The request never got a response
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, "", message)
    }

    /// Build from a failed response, reading the `Status` body when present
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Status>(body) {
            Ok(parsed) => Self::new(Some(status), parsed.reason, parsed.message),
            Err(_) => Self::new(Some(status), "", body.trim()),
        }
    }

    pub fn already_exists(kind: &str, name: &str) -> Self {
        Self::new(
            Some(409),
            REASON_ALREADY_EXISTS,
            format!("{} \"{}\" already exists", kind, name),
        )
    }

    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::new(Some(404), REASON_NOT_FOUND, format!("{} \"{}\" not found", kind, name))
    }
}

/// How a failed API call should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The resource is already there; counts as success for creates
    AlreadyExists,
    /// Worth retrying
    Transient,
    /// Retrying will not help
    Fatal,
}

pub fn classify(err: &ApiError) -> ErrorClass {
    if err.reason == REASON_ALREADY_EXISTS {
        return ErrorClass::AlreadyExists;
    }
    if TRANSIENT_REASONS.contains(&err.reason.as_str()) {
        return ErrorClass::Transient;
    }
    match err.status {
        None => ErrorClass::Transient,
        Some(status) if status >= 500 || status == 429 || status == 408 => ErrorClass::Transient,
        Some(_) => ErrorClass::Fatal,
    }
}

/// Storage for facts
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Create the fact, failing when one with the same name exists
    async fn create_fact(&self, fact: &Fact) -> Result<Fact, ApiError>;
}

/// Lookup of the pipeline activities facts are attached to
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn pipeline_activity(&self, name: &str) -> Result<ResourceReference, ApiError>;
}
