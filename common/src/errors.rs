//! Module errors

use thiserror::Error;

use crate::types::StreamId;

/// Failures a sample source reports when asked to start delivering a stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The sensor or device backing the stream does not exist.
    #[error("Source unavailable for {0}")]
    SourceUnavailable(StreamId),

    /// The transport refused or failed the subscription.
    #[error("Subscription to {stream_id} failed: {reason}")]
    SubscriptionFailed { stream_id: StreamId, reason: String },
}
