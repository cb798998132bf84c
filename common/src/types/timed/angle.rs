use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::streams::SourceFamily;

/// Elevation algorithm that produced an estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Arctangent elevation smoothed by an exponentially-weighted moving average.
    Ewma,
    /// Per-axis blend of acceleration and angular velocity.
    Complementary,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Ewma, Algorithm::Complementary];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Ewma => write!(f, "ewma"),
            Algorithm::Complementary => write!(f, "complementary"),
        }
    }
}

/// One elevation angle, in degrees, produced from one acceleration sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleEstimate {
    pub source: SourceFamily,
    pub algorithm: Algorithm,
    pub value_degrees: f32,
    pub timestamp: i64,
}

impl AngleEstimate {
    pub fn new(
        source: SourceFamily,
        algorithm: Algorithm,
        value_degrees: f32,
        timestamp: i64,
    ) -> Self {
        Self {
            source,
            algorithm,
            value_degrees,
            timestamp,
        }
    }

    /// Series identity used by the recorder and the aggregate snapshot.
    pub fn key(&self) -> (SourceFamily, Algorithm) {
        (self.source, self.algorithm)
    }
}
