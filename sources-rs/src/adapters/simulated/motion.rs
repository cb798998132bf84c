use common::XYZ;

/// Device held still at a fixed elevation: gravity lies in the x/z plane, tilted by
/// `elevation_degrees` above the horizontal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct TiltMotion {
    gravity: f32,
    elevation_degrees: f32,
}

impl TiltMotion {
    pub(super) fn new(gravity: f32, elevation_degrees: f32) -> Self {
        Self {
            gravity,
            elevation_degrees,
        }
    }

    pub(super) fn set_elevation(&mut self, elevation_degrees: f32) {
        self.elevation_degrees = elevation_degrees;
    }

    pub(super) fn acceleration(&self) -> XYZ {
        let theta = self.elevation_degrees.to_radians();
        XYZ::new([self.gravity * theta.cos(), 0.0, self.gravity * theta.sin()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceleration_keeps_gravity_magnitude() {
        let motion = TiltMotion::new(9.81, 37.0);
        assert!((motion.acceleration().norm() - 9.81).abs() < 1e-4);
    }

    #[test]
    fn test_elevation_recovered_from_acceleration() {
        let mut motion = TiltMotion::new(9.81, 0.0);
        for degrees in [-60.0f32, -10.0, 0.0, 25.0, 80.0] {
            motion.set_elevation(degrees);
            let a = motion.acceleration();
            let recovered = a.z().atan2(a.horizontal_norm()).to_degrees();
            assert!((recovered - degrees).abs() < 1e-3);
        }
    }
}
