//! Effective project configuration (`jenkins-x-effective.yml`)
//!
//! Only the parts needed to reach the stage steps are typed. Every other key
//! is carried along in the `extra` maps, so a load/save round trip keeps the
//! rest of the configuration intact.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::Path;

/// Pipeline kinds a project configuration can define
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Release,
    PullRequest,
    Feature,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [
        PipelineKind::Release,
        PipelineKind::PullRequest,
        PipelineKind::Feature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Release => "release",
            PipelineKind::PullRequest => "pullRequest",
            PipelineKind::Feature => "feature",
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level project configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_config: Option<PipelineConfig>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub pipelines: Pipelines,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// Pipelines per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipelines {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PipelineLifecycles>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<PipelineLifecycles>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<PipelineLifecycles>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Pipelines {
    pub fn get(&self, kind: PipelineKind) -> Option<&PipelineLifecycles> {
        match kind {
            PipelineKind::Release => self.release.as_ref(),
            PipelineKind::PullRequest => self.pull_request.as_ref(),
            PipelineKind::Feature => self.feature.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: PipelineKind) -> Option<&mut PipelineLifecycles> {
        match kind {
            PipelineKind::Release => self.release.as_mut(),
            PipelineKind::PullRequest => self.pull_request.as_mut(),
            PipelineKind::Feature => self.feature.as_mut(),
        }
    }
}

/// Lifecycles of one pipeline kind; the staged `pipeline` is the only one
/// touched here
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineLifecycles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<ParsedPipeline>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedPipeline {
    #[serde(default)]
    pub stages: Vec<Stage>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl ProjectConfig {
    /// Load project configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse project configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::malformed("pipeline config", e))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::malformed("pipeline config", e))
    }

    /// Write the configuration to `path`, replacing its content
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stages of the given pipeline kind, if it defines a staged pipeline
    pub fn stages(&self, kind: PipelineKind) -> Option<&[Stage]> {
        self.pipeline_config
            .as_ref()?
            .pipelines
            .get(kind)?
            .pipeline
            .as_ref()
            .map(|p| p.stages.as_slice())
    }

    pub fn stages_mut(&mut self, kind: PipelineKind) -> Option<&mut Vec<Stage>> {
        self.pipeline_config
            .as_mut()?
            .pipelines
            .get_mut(kind)?
            .pipeline
            .as_mut()
            .map(|p| &mut p.stages)
    }
}
