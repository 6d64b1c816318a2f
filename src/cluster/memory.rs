//! In-memory cluster, for dry runs and tests

use crate::cluster::{ActivitySource, ApiError, FactStore};
use crate::fact::{Fact, ResourceReference, API_VERSION, SUBJECT_KIND};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps facts and pipeline activities in maps keyed by name
pub struct InMemoryCluster {
    facts: RwLock<HashMap<String, Fact>>,
    activities: RwLock<HashMap<String, ResourceReference>>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self {
            facts: RwLock::new(HashMap::new()),
            activities: RwLock::new(HashMap::new()),
        }
    }

    /// Register a pipeline activity, returning its reference
    pub async fn add_activity(&self, name: &str) -> ResourceReference {
        let reference = ResourceReference {
            api_version: API_VERSION.to_string(),
            kind: SUBJECT_KIND.to_string(),
            name: name.to_string(),
            uid: Uuid::new_v4().to_string(),
        };
        self.activities
            .write()
            .await
            .insert(name.to_string(), reference.clone());
        reference
    }

    pub async fn fact(&self, name: &str) -> Option<Fact> {
        self.facts.read().await.get(name).cloned()
    }

    pub async fn fact_count(&self) -> usize {
        self.facts.read().await.len()
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactStore for InMemoryCluster {
    async fn create_fact(&self, fact: &Fact) -> Result<Fact, ApiError> {
        let mut facts = self.facts.write().await;
        if facts.contains_key(fact.name()) {
            return Err(ApiError::already_exists("facts.jenkins.io", fact.name()));
        }
        let mut stored = fact.clone();
        stored.metadata.uid = Some(Uuid::new_v4().to_string());
        facts.insert(stored.name().to_string(), stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ActivitySource for InMemoryCluster {
    async fn pipeline_activity(&self, name: &str) -> Result<ResourceReference, ApiError> {
        self.activities
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::not_found("pipelineactivities.jenkins.io", name))
    }
}
