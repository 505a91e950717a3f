use std::io;

use thiserror::Error;

/// Failure to retrieve a single collection. Always recovered by the loader.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{path} not found")]
    NotFound { path: String },

    #[error("{path} answered with status {status}")]
    Status { path: String, status: u16 },

    #[error("request for {path} failed: {message}")]
    Network { path: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a message collection: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    #[error("unknown filter {0:?}")]
    UnknownFilter(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
