use serde::{Deserialize, Serialize};

use crate::types::untimed::{Payload, XYZ};

/// A payload with its arrival timestamp (monotonic milliseconds).
///
/// # Examples
///
/// ```
/// use common::{Payload, Sample, XYZ};
///
/// let sample = Sample::new(1200, Payload::orientation(0.0, 0.0, 1.0));
///
/// assert_eq!(sample.timestamp(), 1200);
/// assert_eq!(sample.xyz(), Some(XYZ::new([0.0, 0.0, 1.0])));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    timestamp: i64,
    payload: Payload,
}

impl Sample {
    pub fn new(timestamp: i64, payload: Payload) -> Self {
        Self { timestamp, payload }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    pub fn xyz(&self) -> Option<XYZ> {
        self.payload.as_xyz()
    }

    pub fn bpm(&self) -> Option<u32> {
        self.payload.as_bpm()
    }
}

impl TryFrom<Vec<f64>> for Sample {
    type Error = &'static str;

    /// Builds an orientation sample from a `[timestamp, x, y, z]` row.
    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [timestamp, x, y, z] => Ok(Sample::new(
                *timestamp as i64,
                Payload::orientation(*x as f32, *y as f32, *z as f32),
            )),
            [timestamp, bpm] if *bpm >= 0.0 => {
                Ok(Sample::new(*timestamp as i64, Payload::HeartRate(*bpm as u32)))
            }
            _ => Err("Invalid length of input vector"),
        }
    }
}
