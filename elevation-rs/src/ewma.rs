use common::constants::MAGNITUDE_EPSILON;
use common::XYZ;

use crate::errors::FilterError;
use crate::utils;

/// Elevation from a single acceleration triple, smoothed with an exponentially-weighted
/// moving average.
///
/// The raw angle is `atan2(az, sqrt(ax² + ay²))`. Each accepted sample updates
/// `last_filtered = alpha * angle + (1 - alpha) * last_filtered`.
#[derive(Clone, Debug, PartialEq)]
pub struct EwmaElevation {
    alpha: f32,
    last_filtered: f32,
}

impl EwmaElevation {
    pub fn new(alpha: f32) -> Result<Self, FilterError> {
        Ok(Self {
            alpha: utils::check_alpha(alpha)?,
            last_filtered: 0.0,
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn last_filtered(&self) -> f32 {
        self.last_filtered
    }

    /// Feeds one acceleration sample and returns the filtered angle in degrees.
    ///
    /// A vertical triple is a full ±90°. Only a triple whose magnitude is below
    /// `MAGNITUDE_EPSILON` has no direction: it returns `0.0` and leaves the filter state
    /// untouched.
    pub fn update(&mut self, ax: f32, ay: f32, az: f32) -> f32 {
        let m = (ax * ax + ay * ay).sqrt();
        let norm = (m * m + az * az).sqrt();
        if norm < MAGNITUDE_EPSILON {
            log::debug!("Degenerate acceleration magnitude {}, skipping update", norm);
            return 0.0;
        }
        let angle = utils::atan2_deg(az, m);
        self.last_filtered = self.alpha * angle + (1.0 - self.alpha) * self.last_filtered;
        self.last_filtered
    }

    pub fn update_xyz(&mut self, accel: &XYZ) -> f32 {
        self.update(accel.x(), accel.y(), accel.z())
    }

    /// Back to the initial condition.
    pub fn reset(&mut self) {
        self.last_filtered = 0.0;
    }
}
