use crate::constants::N_STREAMS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a stream: the external wearable or the host's own sensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    External,
    Internal,
}

impl SourceFamily {
    pub const ALL: [SourceFamily; 2] = [SourceFamily::External, SourceFamily::Internal];

    pub fn acceleration(&self) -> StreamId {
        match self {
            SourceFamily::External => StreamId::ExternalAcceleration,
            SourceFamily::Internal => StreamId::InternalAcceleration,
        }
    }

    pub fn angular_velocity(&self) -> StreamId {
        match self {
            SourceFamily::External => StreamId::ExternalAngularVelocity,
            SourceFamily::Internal => StreamId::InternalAngularVelocity,
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFamily::External => write!(f, "external"),
            SourceFamily::Internal => write!(f, "internal"),
        }
    }
}

/// What a stream measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    HeartRate,
    Acceleration,
    AngularVelocity,
}

/// Identity of one independently startable/stoppable sample feed.
///
/// # Examples
///
/// ```
/// use common::{SourceFamily, StreamId, StreamKind};
///
/// let stream = StreamId::try_from("internal_acceleration").unwrap();
/// assert_eq!(stream, StreamId::InternalAcceleration);
/// assert_eq!(stream.family(), SourceFamily::Internal);
/// assert_eq!(stream.kind(), StreamKind::Acceleration);
/// assert_eq!(stream.to_string(), "internal_acceleration");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamId {
    ExternalHeartRate,
    ExternalAcceleration,
    ExternalAngularVelocity,
    InternalAcceleration,
    InternalAngularVelocity,
}

impl StreamId {
    pub const ALL: [StreamId; N_STREAMS] = [
        StreamId::ExternalHeartRate,
        StreamId::ExternalAcceleration,
        StreamId::ExternalAngularVelocity,
        StreamId::InternalAcceleration,
        StreamId::InternalAngularVelocity,
    ];

    pub fn family(&self) -> SourceFamily {
        match self {
            StreamId::ExternalHeartRate
            | StreamId::ExternalAcceleration
            | StreamId::ExternalAngularVelocity => SourceFamily::External,
            StreamId::InternalAcceleration | StreamId::InternalAngularVelocity => {
                SourceFamily::Internal
            }
        }
    }

    pub fn kind(&self) -> StreamKind {
        match self {
            StreamId::ExternalHeartRate => StreamKind::HeartRate,
            StreamId::ExternalAcceleration | StreamId::InternalAcceleration => {
                StreamKind::Acceleration
            }
            StreamId::ExternalAngularVelocity | StreamId::InternalAngularVelocity => {
                StreamKind::AngularVelocity
            }
        }
    }

    /// True for streams whose samples drive the elevation filters.
    pub fn triggers_elevation(&self) -> bool {
        self.kind() == StreamKind::Acceleration
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamId::ExternalHeartRate => "external_heart_rate",
            StreamId::ExternalAcceleration => "external_acceleration",
            StreamId::ExternalAngularVelocity => "external_angular_velocity",
            StreamId::InternalAcceleration => "internal_acceleration",
            StreamId::InternalAngularVelocity => "internal_angular_velocity",
        }
    }
}

impl From<&StreamId> for usize {
    fn from(value: &StreamId) -> Self {
        *value as usize
    }
}

impl From<StreamId> for usize {
    fn from(value: StreamId) -> Self {
        usize::from(&value)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StreamId {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        StreamId::ALL
            .into_iter()
            .find(|stream| stream.as_str() == normalized)
            .ok_or_else(|| format!("Unknown stream: {}", value))
    }
}

impl TryFrom<String> for StreamId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StreamId::try_from(value.as_str())
    }
}
