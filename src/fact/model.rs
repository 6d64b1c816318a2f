//! `jenkins.io/v1` Fact resource

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const API_VERSION: &str = "jenkins.io/v1";
pub const KIND: &str = "Fact";

/// Fact type of coverage facts
pub const FACT_TYPE_COVERAGE: &str = "jx-coverage";
/// Measurement type of plain counts
pub const MEASUREMENT_COUNT: &str = "count";

/// A normalized set of measurements attached to a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: FactSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Assigned by the cluster on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSpec {
    pub name: String,
    pub fact_type: String,
    pub original: Original,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    /// Reserved, never populated
    #[serde(default)]
    pub statements: Vec<serde_json::Value>,
    pub subject: ResourceReference,
}

/// Where the measured data came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Original {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub name: String,
    pub measurement_type: String,
    pub measurement_value: u64,
}

/// Reference to another cluster resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub uid: String,
}

impl Fact {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Value of the measurement called `name`
    pub fn measurement(&self, name: &str) -> Option<u64> {
        self.spec
            .measurements
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.measurement_value)
    }
}
