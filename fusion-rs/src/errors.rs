//! Module errors

use thiserror::Error;

use common::{SourceError, SourceFamily, StreamId};
use elevation_rs::FilterError;

/// Failures of the coordination and recording layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FusionError {
    #[error("Stream {0} is already running")]
    AlreadyRunning(StreamId),

    #[error("Stream {0} is not running")]
    NotRunning(StreamId),

    #[error("Source unavailable for {0}")]
    SourceUnavailable(StreamId),

    #[error("Subscription to {stream_id} failed: {reason}")]
    SubscriptionFailed { stream_id: StreamId, reason: String },

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Recording duration must be positive, got {0} ms")]
    InvalidDuration(i64),

    #[error("No source registered for the {0} family")]
    NoSourceForFamily(SourceFamily),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl From<SourceError> for FusionError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::SourceUnavailable(stream_id) => FusionError::SourceUnavailable(stream_id),
            SourceError::SubscriptionFailed { stream_id, reason } => {
                FusionError::SubscriptionFailed { stream_id, reason }
            }
        }
    }
}

/// Failures while loading a [`FusionConfig`](crate::config::FusionConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
