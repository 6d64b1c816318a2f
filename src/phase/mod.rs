//! The two phases of a build: `configure` before it runs, `create` after

pub mod configure;
pub mod create;

use crate::error::{Error, Result};
use crate::git;
use tracing::error;

pub use configure::{configure, ConfigureOptions, ConfigureOutcome};
pub use create::{create, CreateOptions};

pub const SOURCE_URL: &str = "source-url";
pub const BRANCH_NAME: &str = "branch-name";
pub const BUILD_NUMBER: &str = "build-number";

/// Identifies the build both phases run for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCoordinates {
    pub source_url: String,
    pub branch_name: String,
    pub build_number: String,
}

impl BuildCoordinates {
    pub fn new(source_url: &str, branch_name: &str, build_number: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            branch_name: branch_name.to_string(),
            build_number: build_number.to_string(),
        }
    }

    /// Names of the parameters that are empty
    pub fn missing(&self) -> Vec<String> {
        [
            (SOURCE_URL, &self.source_url),
            (BRANCH_NAME, &self.branch_name),
            (BUILD_NUMBER, &self.build_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// Fail with every missing parameter at once
    pub fn verify(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        for name in &missing {
            error!("required parameter '{}' is missing", name);
        }
        Err(Error::MissingParameters(missing))
    }

    pub fn pipeline_activity_name(&self) -> Result<String> {
        git::pipeline_activity_name(&self.source_url, &self.branch_name, &self.build_number)
    }
}
