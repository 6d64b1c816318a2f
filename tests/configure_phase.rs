//! Configure phase against a Maven project on disk

mod helpers;

use helpers::*;
use jx_app_jacoco::phase::{configure, ConfigureOptions, ConfigureOutcome};
use jx_app_jacoco::pipeline::{PipelineKind, ProjectConfig, FACT_STEP_NAME};
use jx_app_jacoco::pom::count_jacoco_plugins;
use jx_app_jacoco::xml::Document;
use jx_app_jacoco::Error;
use std::path::Path;

fn options(dir: &Path) -> ConfigureOptions {
    ConfigureOptions {
        source_dir: dir.to_path_buf(),
        context: String::new(),
        build: build(),
        image: IMAGE.to_string(),
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_configure_adds_plugin_and_step() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), POM);

    let outcome = configure(&options(dir.path())).unwrap();

    assert_eq!(
        outcome,
        ConfigureOutcome::Configured {
            pom: dir.path().join("pom.xml"),
            pipeline: dir.path().join("jenkins-x-effective.yml"),
        }
    );

    let pom = Document::from_str(&read(&dir.path().join("pom.xml"))).unwrap();
    assert_eq!(count_jacoco_plugins(&pom), 1);

    let pipeline = ProjectConfig::from_file(dir.path().join("jenkins-x-effective.yml")).unwrap();
    for kind in [PipelineKind::Release, PipelineKind::PullRequest] {
        let stages = pipeline.stages(kind).unwrap();
        let last = stages.last().unwrap();
        assert_eq!(last.steps.last().unwrap().name.as_deref(), Some(FACT_STEP_NAME));
        let added: usize = stages
            .iter()
            .flat_map(|s| &s.steps)
            .filter(|s| s.name.as_deref() == Some(FACT_STEP_NAME))
            .count();
        assert_eq!(added, 1, "{} gains exactly one step", kind);
    }
    assert!(pipeline.stages(PipelineKind::Feature).is_none());
}

#[test]
fn test_configure_keeps_backups() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), POM);

    configure(&options(dir.path())).unwrap();

    assert_eq!(read(&dir.path().join("pom.xml.jacoco.orig")), POM);
    assert_eq!(
        read(&dir.path().join("jenkins-x-effective.yml.jacoco.orig")),
        EFFECTIVE_PIPELINE
    );
}

#[test]
fn test_existing_jacoco_plugin_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), POM_WITH_JACOCO);

    configure(&options(dir.path())).unwrap();

    let pom = read(&dir.path().join("pom.xml"));
    assert_eq!(count_jacoco_plugins(&Document::from_str(&pom).unwrap()), 1);
    assert!(pom.contains("<version>0.8.4</version>"));
    assert!(!pom.contains("<version>0.8.2</version>"));
}

#[test]
fn test_pom_configuration_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), POM);

    configure(&options(dir.path())).unwrap();
    let once = read(&dir.path().join("pom.xml"));
    configure(&options(dir.path())).unwrap();
    let twice = read(&dir.path().join("pom.xml"));

    assert_eq!(once, twice);
}

#[test]
fn test_pipeline_context_selects_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pom.xml"), POM).unwrap();
    std::fs::write(dir.path().join("jenkins-x-backend-effective.yml"), EFFECTIVE_PIPELINE).unwrap();

    let mut opts = options(dir.path());
    opts.context = "backend".to_string();
    configure(&opts).unwrap();

    let pipeline = ProjectConfig::from_file(dir.path().join("jenkins-x-backend-effective.yml")).unwrap();
    let release = pipeline.stages(PipelineKind::Release).unwrap();
    assert_eq!(
        release.last().unwrap().steps.last().unwrap().image.as_deref(),
        Some(IMAGE)
    );
}

#[test]
fn test_missing_pipeline_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pom.xml"), POM).unwrap();

    let result = configure(&options(dir.path()));
    assert!(matches!(result, Err(Error::ConfigNotFound(_))));
}

#[test]
fn test_malformed_pom_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), "<project><build><plugins></build></project>");

    let result = configure(&options(dir.path()));

    assert!(matches!(result, Err(Error::Malformed { .. })));
    assert_eq!(
        read(&dir.path().join("pom.xml")),
        "<project><build><plugins></build></project>"
    );
    assert!(!dir.path().join("pom.xml.jacoco.orig").exists());
}

#[test]
fn test_pom_without_plugins_fails() {
    let dir = tempfile::tempdir().unwrap();
    maven_project(dir.path(), "<project><build></build></project>");

    let result = configure(&options(dir.path()));
    assert!(matches!(result, Err(Error::AnchorNotFound(ref anchor)) if anchor == "plugins"));
}
