//! Configure phase: add the JaCoCo plugin to `pom.xml` and the fact step
//! to the effective pipeline config

use crate::error::Result;
use crate::phase::BuildCoordinates;
use crate::pipeline::PipelineConfigurator;
use crate::pom::PomConfigurator;
use crate::util;
use std::path::PathBuf;
use tracing::info;

pub const POM_XML: &str = "pom.xml";

#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Maven project directory, also holding the effective pipeline config
    pub source_dir: PathBuf,
    /// Build context, empty for the default pipeline
    pub context: String,
    pub build: BuildCoordinates,
    /// Image running the fact creation step
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// No `pom.xml`, nothing was changed
    NoPom,
    Configured { pom: PathBuf, pipeline: PathBuf },
}

/// Enable the JaCoCo report in the build and schedule fact creation after it
pub fn configure(options: &ConfigureOptions) -> Result<ConfigureOutcome> {
    options.build.verify()?;

    let pom = options.source_dir.join(POM_XML);
    if !util::exists(&pom) {
        info!("nothing to do, no pom.xml in '{}'", options.source_dir.display());
        return Ok(ConfigureOutcome::NoPom);
    }

    PomConfigurator::new(&pom).configure_pom()?;

    let pipeline =
        PipelineConfigurator::new(&options.source_dir, &options.context, &options.image).configure_pipeline()?;

    Ok(ConfigureOutcome::Configured { pom, pipeline })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn options(dir: &std::path::Path, build: BuildCoordinates) -> ConfigureOptions {
        ConfigureOptions {
            source_dir: dir.to_path_buf(),
            context: String::new(),
            build,
            image: "gcr.io/jenkinsxio/jx-app-jacoco:0.0.1".to_string(),
        }
    }

    #[test]
    fn test_nothing_to_do_without_pom() {
        let dir = tempfile::tempdir().unwrap();
        let build = BuildCoordinates::new("https://github.com/acme/app", "master", "1");

        let outcome = configure(&options(dir.path(), build)).unwrap();

        assert_eq!(outcome, ConfigureOutcome::NoPom);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_parameters_checked_first() {
        let dir = tempfile::tempdir().unwrap();
        let result = configure(&options(dir.path(), BuildCoordinates::default()));
        assert!(matches!(result, Err(Error::MissingParameters(ref m)) if m.len() == 3));
    }
}
