//! jx-app-jacoco - JaCoCo code coverage for Jenkins X builds

pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod fact;
pub mod git;
pub mod logging;
pub mod phase;
pub mod pipeline;
pub mod pom;
pub mod report;
pub mod retry;
pub mod util;
pub mod version;
pub mod xml;

// Re-export commonly used types
pub use cluster::{ActivitySource, ApiError, FactStore, InMemoryCluster, KubeClient};
pub use config::ClusterConfig;
pub use error::{Error, Result};
pub use fact::{Fact, FactPublisher, PublishOutcome};
pub use phase::{BuildCoordinates, ConfigureOptions, ConfigureOutcome, CreateOptions};
pub use pipeline::PipelineConfigurator;
pub use pom::PomConfigurator;
pub use report::CoverageReport;
pub use retry::RetryPolicy;
