use common::constants::MAGNITUDE_EPSILON;
use common::XYZ;

use crate::errors::FilterError;
use crate::utils;

/// Elevation from acceleration blended with angular velocity.
///
/// Each axis is combined as `alpha * a + (1 - alpha) * g`; the angle is
/// `atan2(b_y, |b|)` of the blended vector `b`. Stateless apart from `alpha`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplementaryElevation {
    alpha: f32,
}

impl ComplementaryElevation {
    pub fn new(alpha: f32) -> Result<Self, FilterError> {
        Ok(Self {
            alpha: utils::check_alpha(alpha)?,
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn compute(&self, accel: &XYZ, gyro: &XYZ) -> f32 {
        let blended = *accel * self.alpha + *gyro * (1.0 - self.alpha);
        let magnitude = blended.norm();
        if magnitude < MAGNITUDE_EPSILON {
            return 0.0;
        }
        utils::atan2_deg(blended.y(), magnitude)
    }

    pub fn compute_components(&self, ax: f32, ay: f32, az: f32, gx: f32, gy: f32, gz: f32) -> f32 {
        self.compute(&XYZ::new([ax, ay, az]), &XYZ::new([gx, gy, gz]))
    }
}
