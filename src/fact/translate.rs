//! Translation of a JaCoCo report into a coverage fact

use crate::fact::model::{
    Fact, FactSpec, Measurement, ObjectMeta, Original, ResourceReference, API_VERSION,
    FACT_TYPE_COVERAGE, KIND, MEASUREMENT_COUNT,
};
use crate::report::{Counter, CounterType, CoverageReport};
use std::collections::BTreeMap;
use tracing::trace;

pub const APP_NAME: &str = "jacoco";
pub const REPORT_MIME_TYPE: &str = "application/xml";
pub const REPORT_TAG: &str = "jacoco.xml";
pub const SUBJECT_KIND: &str = "PipelineActivity";

/// Metric derived from each counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Coverage,
    Missed,
    Total,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Coverage, MetricKind::Missed, MetricKind::Total];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Coverage => "Coverage",
            MetricKind::Missed => "Missed",
            MetricKind::Total => "Total",
        }
    }

    fn value(&self, counter: &Counter) -> u64 {
        match self {
            MetricKind::Coverage => counter.covered,
            MetricKind::Missed => counter.missed,
            MetricKind::Total => counter.total(),
        }
    }
}

/// Canonical measurement prefix for a raw counter type; unknown types map to
/// the empty string
pub fn canonical_type(raw: &str) -> &'static str {
    CounterType::from_report(raw).map(|t| t.as_str()).unwrap_or("")
}

/// Deterministic fact name for a pipeline activity
pub fn fact_name(activity_name: &str) -> String {
    format!("{}-{}-{}", APP_NAME, FACT_TYPE_COVERAGE, activity_name)
}

/// Coverage, missed and total measurements of one counter
pub fn measurements(counter: &Counter) -> Vec<Measurement> {
    let canonical = canonical_type(&counter.counter_type);
    MetricKind::ALL
        .iter()
        .map(|kind| Measurement {
            name: format!("{}-{}", canonical, kind.as_str()),
            measurement_type: MEASUREMENT_COUNT.to_string(),
            measurement_value: kind.value(counter),
        })
        .collect()
}

/// Build the coverage fact for `report`, owned by `activity`
pub fn translate(report: &CoverageReport, activity: &ResourceReference, origin_url: &str) -> Fact {
    let measurements = report.counters.iter().flat_map(measurements).collect();
    let name = fact_name(&activity.name);

    let mut labels = BTreeMap::new();
    labels.insert("subjectkind".to_string(), SUBJECT_KIND.to_string());
    labels.insert("pipelineName".to_string(), activity.name.clone());

    let fact = Fact {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: ObjectMeta {
            name: name.clone(),
            labels,
            ..Default::default()
        },
        spec: FactSpec {
            name,
            fact_type: FACT_TYPE_COVERAGE.to_string(),
            original: Original {
                url: origin_url.to_string(),
                mimetype: REPORT_MIME_TYPE.to_string(),
                tags: vec![REPORT_TAG.to_string()],
            },
            tags: vec![APP_NAME.to_string()],
            measurements,
            statements: Vec::new(),
            subject: activity.clone(),
        },
    };
    trace!("created fact: {:?}", fact);
    fact
}
