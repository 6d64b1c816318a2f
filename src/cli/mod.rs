//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{ConfigureCommand, CreateCommand};
use std::ffi::OsString;

/// Jenkins X app collecting JaCoCo code coverage
#[derive(Debug, Parser, Clone)]
#[command(name = "jx-app-jacoco")]
#[command(version = crate::version::VERSION)]
#[command(about = "Configures Maven builds for JaCoCo and records coverage facts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text, env = "JX_APP_JACOCO_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Configure pom.xml and the effective pipeline config
    Configure(ConfigureCommand),

    /// Create the JaCoCo coverage fact
    Create(CreateCommand),

    /// Print the version and image of this app
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_configure_arguments() {
        let cli = Cli::try_parse_from([
            "jx-app-jacoco",
            "--verbose",
            "configure",
            "--source-dir",
            "/workspace/source",
            "--source-url",
            "https://github.com/acme/app.git",
            "--branch-name",
            "master",
            "--build-number",
            "4",
            "--pipeline-context",
            "backend",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Text);
        match cli.command {
            Command::Configure(cmd) => {
                assert_eq!(cmd.build.source_dir, PathBuf::from("/workspace/source"));
                assert_eq!(cmd.build.build_number.as_deref(), Some("4"));
                assert_eq!(cmd.pipeline_context, "backend");
            }
            other => panic!("Expected configure, got {:?}", other),
        }
    }

    #[test]
    fn test_create_arguments() {
        let cli = Cli::try_parse_from([
            "jx-app-jacoco",
            "create",
            "--log-format",
            "json",
            "--source-url",
            "https://github.com/acme/app.git",
            "--report",
            "/tmp/jacoco.xml",
            "--namespace",
            "jx-staging",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Create(cmd) => {
                assert_eq!(cmd.report, Some(PathBuf::from("/tmp/jacoco.xml")));
                assert_eq!(cmd.namespace.as_deref(), Some("jx-staging"));
                assert_eq!(cmd.report_url, "");
            }
            other => panic!("Expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_version_command() {
        let cli = Cli::try_parse_from(["jx-app-jacoco", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["jx-app-jacoco", "run"]).is_err());
    }
}
