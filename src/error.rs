//! Error types shared by the configurators, the report translator and the
//! fact publisher

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring descriptors or publishing facts
#[derive(Debug, Error)]
pub enum Error {
    /// Input document could not be parsed
    #[error("malformed {what}: {reason}")]
    Malformed { what: String, reason: String },

    /// An expected structural element was not found
    #[error("unable to find <{0}> element")]
    AnchorNotFound(String),

    #[error("specified directory '{0}' does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("unable to find effective pipeline config '{0}'")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backup or overwrite of a descriptor failed
    #[error("unable to write '{path}': {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Publication kept failing after all retries
    #[error("giving up after {attempts} attempts: {last_error}")]
    TransientFailure { attempts: u32, last_error: String },

    /// Non-retryable error returned by the cluster API
    #[error("cluster API error: {0}")]
    Api(#[from] crate::cluster::ApiError),

    #[error("configuration error: {0}")]
    Config(String),

    /// Required command parameters left empty
    #[error("not all required parameters specified, missing: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("unable to parse git URL '{0}'")]
    InvalidGitUrl(String),
}

impl Error {
    pub(crate) fn malformed(what: impl Into<String>, reason: impl ToString) -> Self {
        Error::Malformed {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
