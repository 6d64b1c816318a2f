//! Create phase: turn the JaCoCo report of a finished build into a
//! coverage fact on the cluster

use crate::cluster::{ActivitySource, FactStore};
use crate::error::Result;
use crate::fact::{translate, Fact, FactPublisher, PublishOutcome};
use crate::phase::BuildCoordinates;
use crate::report::{CoverageReport, REPORT_PATH};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub source_dir: PathBuf,
    /// Report to read instead of the one under `source_dir`
    pub report: Option<PathBuf>,
    /// Where the report can be downloaded from, recorded in the fact
    pub report_url: String,
    pub build: BuildCoordinates,
}

impl CreateOptions {
    pub fn report_path(&self) -> PathBuf {
        match &self.report {
            Some(report) => report.clone(),
            None => REPORT_PATH.iter().fold(self.source_dir.clone(), |path, part| path.join(part)),
        }
    }
}

/// Turn the build's JaCoCo report into a fact attached to its pipeline
/// activity
pub async fn create<A, S>(
    options: &CreateOptions,
    activities: &A,
    publisher: &FactPublisher<S>,
) -> Result<(Fact, PublishOutcome)>
where
    A: ActivitySource + ?Sized,
    S: FactStore,
{
    options.build.verify()?;

    let report_path = options.report_path();
    info!("reading JaCoCo report '{}'", report_path.display());
    let report = CoverageReport::from_file(&report_path)?;

    let activity_name = options.build.pipeline_activity_name()?;
    let activity = activities.pipeline_activity(&activity_name).await?;

    let fact = translate(&report, &activity, &options.report_url);
    let outcome = publisher.publish(&fact).await?;
    info!(
        "successfully stored JaCoCo fact '{}' for report from {}",
        fact.spec.name, fact.spec.original.url
    );
    Ok((fact, outcome))
}
