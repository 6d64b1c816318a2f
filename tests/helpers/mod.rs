//! Shared fixtures for the phase tests

#![allow(dead_code)]

use async_trait::async_trait;
use jx_app_jacoco::cluster::{ApiError, FactStore, InMemoryCluster};
use jx_app_jacoco::fact::Fact;
use jx_app_jacoco::phase::BuildCoordinates;
use jx_app_jacoco::RetryPolicy;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const IMAGE: &str = "gcr.io/jenkinsxio/jx-app-jacoco:0.0.1";
pub const SOURCE_URL: &str = "https://github.com/acme/roadrunner.git";
pub const ACTIVITY: &str = "acme-roadrunner-master-1";

pub const POM: &str = include_str!("../testdata/pom-no-jacoco-plugin-configured.xml");
pub const POM_WITH_JACOCO: &str = include_str!("../testdata/pom-with-jacoco-plugin-configured.xml");

pub const EFFECTIVE_PIPELINE: &str = r#"buildPack: maven
pipelineConfig:
  agent:
    label: jenkins-maven
  pipelines:
    release:
      pipeline:
        stages:
          - name: from-build-pack
            steps:
              - name: build
                image: maven
                command: mvn
                args:
                  - clean
                  - deploy
          - name: promote
            steps:
              - name: changelog
                command: jx
                args:
                  - step
                  - changelog
    pullRequest:
      pipeline:
        stages:
          - name: from-build-pack
            steps:
              - name: build
                image: maven
                command: mvn
                args:
                  - install
"#;

pub fn build() -> BuildCoordinates {
    BuildCoordinates::new(SOURCE_URL, "master", "1")
}

/// Lay out a Maven project with an effective pipeline config
pub fn maven_project(dir: &Path, pom: &str) -> PathBuf {
    std::fs::write(dir.join("pom.xml"), pom).unwrap();
    std::fs::write(dir.join("jenkins-x-effective.yml"), EFFECTIVE_PIPELINE).unwrap();
    dir.to_path_buf()
}

/// JaCoCo report with one counter per entry of `counters`
/// (`type`, `covered`, `missed`)
pub fn jacoco_report(counters: &[(&str, u64, u64)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <!DOCTYPE report PUBLIC \"-//JACOCO//DTD Report 1.1//EN\" \"report.dtd\">\n\
         <report name=\"roadrunner\">\n  <sessioninfo id=\"build\" start=\"1\" dump=\"2\"/>\n",
    );
    for (counter_type, covered, missed) in counters {
        xml.push_str(&format!(
            "  <counter type=\"{}\" missed=\"{}\" covered=\"{}\"/>\n",
            counter_type, missed, covered
        ));
    }
    xml.push_str("</report>\n");
    xml
}

/// Write a report where the build puts it
pub fn write_report(source_dir: &Path, xml: &str) -> PathBuf {
    let dir = source_dir.join("target").join("site").join("jacoco");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("jacoco.xml");
    std::fs::write(&path, xml).unwrap();
    path
}

pub async fn cluster_with_activity() -> InMemoryCluster {
    let cluster = InMemoryCluster::new();
    cluster.add_activity(ACTIVITY).await;
    cluster
}

pub fn fast_retries() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_ms: 2,
        jitter: false,
        ..Default::default()
    }
}

/// Fact store failing with predefined errors before delegating to an
/// in-memory cluster
pub struct FlakyStore {
    errors: Mutex<Vec<ApiError>>,
    calls: AtomicUsize,
    inner: InMemoryCluster,
}

impl FlakyStore {
    pub fn new(errors: Vec<ApiError>) -> Self {
        Self {
            errors: Mutex::new(errors),
            calls: AtomicUsize::new(0),
            inner: InMemoryCluster::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryCluster {
        &self.inner
    }
}

#[async_trait]
impl FactStore for FlakyStore {
    async fn create_fact(&self, fact: &Fact) -> Result<Fact, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next_error = {
            let mut errors = self.errors.lock().unwrap();
            if errors.is_empty() {
                None
            } else {
                Some(errors.remove(0))
            }
        };
        match next_error {
            Some(err) => Err(err),
            None => self.inner.create_fact(fact).await,
        }
    }
}
