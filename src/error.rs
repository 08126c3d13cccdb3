use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: Box<CheckerError>,
    },

    #[error("failed to unmarshal: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to GET {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("expected status code to be 200, got {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to unmarshal response from {url}: {source}")]
    IndexDecode {
        url: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("empty index document at {url}")]
    EmptyIndex { url: String },

    #[error("failed to parse version '{version}': {reason}")]
    VersionParse { version: String, reason: String },

    #[error("no version for chart '{name}' in repository '{repository}'")]
    ChartNotFound { name: String, repository: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckerError>;
