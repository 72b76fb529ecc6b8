use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a scan or a check run.
///
/// Problems found *in* the wiki (broken links, short pages, unreachable URLs) are never
/// reported through this type; they become [`crate::model::Issue`]s on the document or wiki.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("scan directory {0} does not exist or is not a directory")]
    NotFound(PathBuf),

    #[error("the on-disk file for document {path} cannot be found")]
    DocumentNotFound { path: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to start link check workers: {0}")]
    WorkerPool(String),
}

pub type Result<T, E = WikiError> = std::result::Result<T, E>;
