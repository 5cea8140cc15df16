//
// error.rs
// plagscan
//
// Typed errors for detection settings and report output.
//
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("n-gram size must be at least 1")]
    InvalidNgramSize,

    #[error("winnowing window must be at least 1")]
    InvalidWindow,

    #[error("threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("no source documents to compare against")]
    NoSources,

    #[error("unknown similarity metric '{0}' (expected containment, jaccard, cosine or winnowing)")]
    UnknownMetric(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
}
