use serde::{Deserialize, Serialize};

use crate::types::streams::{StreamId, StreamKind};
use crate::types::untimed::XYZ;

/// Value carried by a sample. Orientation covers both acceleration and angular
/// velocity; the stream identity tells them apart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Orientation(XYZ),
    HeartRate(u32),
}

impl Payload {
    pub fn orientation(x: f32, y: f32, z: f32) -> Self {
        Payload::Orientation(XYZ::new([x, y, z]))
    }

    pub fn as_xyz(&self) -> Option<XYZ> {
        match self {
            Payload::Orientation(xyz) => Some(*xyz),
            Payload::HeartRate(_) => None,
        }
    }

    pub fn as_bpm(&self) -> Option<u32> {
        match self {
            Payload::HeartRate(bpm) => Some(*bpm),
            Payload::Orientation(_) => None,
        }
    }

    /// Whether this payload has the shape `stream_id` delivers.
    pub fn matches(&self, stream_id: StreamId) -> bool {
        matches!(
            (self, stream_id.kind()),
            (Payload::HeartRate(_), StreamKind::HeartRate)
                | (Payload::Orientation(_), StreamKind::Acceleration)
                | (Payload::Orientation(_), StreamKind::AngularVelocity)
        )
    }

    /// Flattened numeric columns, as an exporter would write them.
    pub fn columns(&self) -> Vec<f32> {
        match self {
            Payload::Orientation(xyz) => xyz.inner().to_vec(),
            Payload::HeartRate(bpm) => vec![*bpm as f32],
        }
    }
}
