//! Error taxonomy for orchestration.
//!
//! `Malformed` marks per-record problems the builders log and skip.
//! Everything else is structural and propagates, aborting the run.

use thiserror::Error;

use crate::store::StoreError;
use fieldshare_feeds::FeedError;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("malformed record at {path}: {message}")]
    Malformed { path: String, message: String },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl IndexError {
    pub fn malformed(path: &str, message: impl Into<String>) -> Self {
        IndexError::Malformed {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error is a per-record condition that a batch should
    /// log and skip rather than abort on.
    pub fn is_per_record(&self) -> bool {
        matches!(self, IndexError::Malformed { .. })
    }
}
