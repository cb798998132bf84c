use crate::types::streams::StreamId;
use crate::types::timed::{AngleEstimate, Sample};

/// Anything the coordinator emits while streams run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StreamEvent {
    Raw { stream_id: StreamId, sample: Sample },
    Angle(AngleEstimate),
}

impl StreamEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            StreamEvent::Raw { sample, .. } => sample.timestamp(),
            StreamEvent::Angle(angle) => angle.timestamp,
        }
    }

    /// Stream the event is published under. Angles belong to the acceleration stream
    /// of the family that produced them.
    pub fn topic(&self) -> StreamId {
        match self {
            StreamEvent::Raw { stream_id, .. } => *stream_id,
            StreamEvent::Angle(angle) => angle.source.acceleration(),
        }
    }
}
