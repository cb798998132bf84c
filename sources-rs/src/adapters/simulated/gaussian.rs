use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use common::XYZ;

use crate::errors::SimulationError;

/// Functionality to add some Gaussian noise.
#[derive(Clone, Debug)]
pub(super) struct GaussianNoise {
    normal: Normal<f64>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev
    pub(super) fn new(mean: f64, stdev: f64) -> Result<Self, SimulationError> {
        if !(stdev.is_finite() && stdev >= 0.0) {
            return Err(SimulationError::InvalidNoise(stdev));
        }
        let normal = Normal::new(mean, stdev).map_err(|_| SimulationError::InvalidNoise(stdev))?;
        Ok(Self { normal })
    }

    /// Sample from distribution
    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f64 {
        self.normal.sample(rng)
    }

    /// Adds independent noise to each axis
    pub(super) fn add_noise_xyz(&self, rng: &mut StdRng, data: XYZ) -> XYZ {
        let [x, y, z] = data.inner();
        XYZ::new([
            x + self.draw_sample(rng) as f32,
            y + self.draw_sample(rng) as f32,
            z + self.draw_sample(rng) as f32,
        ])
    }

    /// Adds noise to a heart rate, never going below zero
    pub(super) fn add_noise_bpm(&self, rng: &mut StdRng, bpm: u32) -> u32 {
        (bpm as f64 + self.draw_sample(rng)).round().max(0.0) as u32
    }
}
