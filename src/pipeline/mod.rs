//! Jenkins X pipeline configuration
//!
//! This module models the effective pipeline configuration and appends the
//! `jacoco-create-fact` step to it.

pub mod config;
pub mod configurator;

pub use config::{PipelineKind, ProjectConfig, Stage, Step};
pub use configurator::{effective_config_name, PipelineConfigurator, FACT_STEP_NAME};
