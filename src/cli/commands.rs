//! CLI command definitions

use crate::phase::{BuildCoordinates, ConfigureOptions, CreateOptions};
use clap::Args;
use std::path::PathBuf;

/// Identification of the build, shared by `configure` and `create`
///
/// Values are optional for clap so that all missing ones can be reported
/// together.
#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Directory containing the Maven project
    #[arg(long, default_value = ".")]
    pub source_dir: PathBuf,

    /// The git repo URL
    #[arg(long, env = "SOURCE_URL")]
    pub source_url: Option<String>,

    /// The git branch name
    #[arg(long, env = "BRANCH_NAME")]
    pub branch_name: Option<String>,

    /// The build number
    #[arg(long, env = "BUILD_NUMBER")]
    pub build_number: Option<String>,
}

impl BuildArgs {
    pub fn coordinates(&self) -> BuildCoordinates {
        BuildCoordinates::new(
            self.source_url.as_deref().unwrap_or_default(),
            self.branch_name.as_deref().unwrap_or_default(),
            self.build_number.as_deref().unwrap_or_default(),
        )
    }
}

/// Configure pom.xml and the effective pipeline config
#[derive(Debug, Args, Clone)]
pub struct ConfigureCommand {
    #[command(flatten)]
    pub build: BuildArgs,

    /// The build context
    #[arg(long, default_value = "", env = "PIPELINE_CONTEXT")]
    pub pipeline_context: String,
}

impl ConfigureCommand {
    pub fn options(&self, image: &str) -> ConfigureOptions {
        ConfigureOptions {
            source_dir: self.build.source_dir.clone(),
            context: self.pipeline_context.clone(),
            build: self.build.coordinates(),
            image: image.to_string(),
        }
    }
}

/// Create the coverage fact
#[derive(Debug, Args, Clone)]
pub struct CreateCommand {
    #[command(flatten)]
    pub build: BuildArgs,

    /// JaCoCo XML report, defaults to target/site/jacoco/jacoco.xml in the
    /// source directory
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// URL the report can be retrieved from
    #[arg(long, default_value = "")]
    pub report_url: String,

    /// Namespace of the pipeline activities and facts
    #[arg(short, long)]
    pub namespace: Option<String>,
}

impl CreateCommand {
    pub fn options(&self) -> CreateOptions {
        CreateOptions {
            source_dir: self.build.source_dir.clone(),
            report: self.report.clone(),
            report_url: self.report_url.clone(),
            build: self.build.coordinates(),
        }
    }
}
