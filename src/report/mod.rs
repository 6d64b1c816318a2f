//! JaCoCo XML report

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Report location relative to the Maven project directory
pub const REPORT_PATH: [&str; 4] = ["target", "site", "jacoco", "jacoco.xml"];

/// Counter categories JaCoCo reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterType {
    Instruction,
    Line,
    Method,
    Complexity,
    Branch,
    Class,
}

impl CounterType {
    pub const ALL: [CounterType; 6] = [
        CounterType::Instruction,
        CounterType::Line,
        CounterType::Method,
        CounterType::Complexity,
        CounterType::Branch,
        CounterType::Class,
    ];

    /// Parse the `type` attribute of a `<counter>`
    pub fn from_report(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterType::Instruction => "INSTRUCTION",
            CounterType::Line => "LINE",
            CounterType::Method => "METHOD",
            CounterType::Complexity => "COMPLEXITY",
            CounterType::Branch => "BRANCH",
            CounterType::Class => "CLASS",
        }
    }
}

/// Report-level counters of a JaCoCo XML report
///
/// Package, class and method counters are not read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoverageReport {
    #[serde(rename = "@name", default)]
    pub name: String,

    #[serde(rename = "counter", default)]
    pub counters: Vec<Counter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Counter {
    /// Raw counter type, kept as a string so newer report types still load
    #[serde(rename = "@type")]
    pub counter_type: String,

    #[serde(rename = "@missed")]
    pub missed: u64,

    #[serde(rename = "@covered")]
    pub covered: u64,
}

impl Counter {
    pub fn new(counter_type: impl Into<String>, covered: u64, missed: u64) -> Self {
        Self {
            counter_type: counter_type.into(),
            missed,
            covered,
        }
    }

    pub fn kind(&self) -> Option<CounterType> {
        CounterType::from_report(&self.counter_type)
    }

    pub fn total(&self) -> u64 {
        self.covered.saturating_add(self.missed)
    }
}

impl CoverageReport {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        quick_xml::de::from_reader(reader).map_err(|e| Error::malformed("JaCoCo report", e))
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(|e| Error::malformed("JaCoCo report", e))
    }
}
