//! Adds the fact creation step to the effective pipeline configuration

use crate::error::{Error, Result};
use crate::pipeline::config::{PipelineKind, ProjectConfig, Step};
use crate::util;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FACT_STEP_NAME: &str = "jacoco-create-fact";
pub const FACT_STEP_COMMAND: &str = "/jx-app-jacoco";
pub const FACT_STEP_ARGS: [&str; 1] = ["create"];

/// Name of the effective pipeline config for a build context
pub fn effective_config_name(context: &str) -> String {
    if context.is_empty() {
        "jenkins-x-effective.yml".to_string()
    } else {
        format!("jenkins-x-{}-effective.yml", context)
    }
}

/// Prepares the pipeline so that the coverage fact gets created after the
/// build
#[derive(Debug, Clone)]
pub struct PipelineConfigurator {
    source_dir: PathBuf,
    context: String,
    image: String,
}

impl PipelineConfigurator {
    /// # Arguments
    /// * `source_dir` - Directory holding the effective pipeline config
    /// * `context` - Build context, empty for the default pipeline
    /// * `image` - Image running the fact creation step
    pub fn new(source_dir: impl Into<PathBuf>, context: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            context: context.into(),
            image: image.into(),
        }
    }

    pub fn effective_config_path(&self) -> PathBuf {
        self.source_dir.join(effective_config_name(&self.context))
    }

    /// Rewrite the effective pipeline config, keeping a backup of the
    /// original next to it
    ///
    /// Returns the path of the rewritten file.
    pub fn configure_pipeline(&self) -> Result<PathBuf> {
        info!("processing directory '{}'", self.source_dir.display());

        if !util::is_directory(&self.source_dir) {
            return Err(Error::DirectoryNotFound(self.source_dir.clone()));
        }

        let config_path = self.effective_config_path();
        if !util::exists(&config_path) {
            return Err(Error::ConfigNotFound(config_path));
        }

        let mut project_config = ProjectConfig::from_file(&config_path)?;
        self.add_fact_creation_step(&mut project_config);
        self.write_project_config(&project_config, &config_path)?;
        Ok(config_path)
    }

    /// Append the fact creation step to the last stage of every pipeline
    /// kind present, returning the kinds that were extended
    pub fn add_fact_creation_step(&self, project_config: &mut ProjectConfig) -> Vec<PipelineKind> {
        let mut extended = Vec::new();
        for kind in PipelineKind::ALL {
            let Some(stages) = project_config.stages_mut(kind) else {
                continue;
            };
            match stages.last_mut() {
                Some(last_stage) => {
                    last_stage.steps.push(self.create_fact_step());
                    extended.push(kind);
                }
                None => warn!("{} pipeline has no stages, not adding {}", kind, FACT_STEP_NAME),
            }
        }
        extended
    }

    fn write_project_config(&self, project_config: &ProjectConfig, path: &Path) -> Result<()> {
        util::backup(path)?;
        info!("writing '{}'", path.display());
        project_config.save(path)
    }

    fn create_fact_step(&self) -> Step {
        Step {
            name: Some(FACT_STEP_NAME.to_string()),
            image: Some(self.image.clone()),
            command: Some(FACT_STEP_COMMAND.to_string()),
            args: FACT_STEP_ARGS.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }
}
