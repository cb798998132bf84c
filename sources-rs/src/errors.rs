//! Module errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid noise standard deviation: {0}")]
    InvalidNoise(f64),

    #[error("Sampling period must be positive")]
    InvalidPeriod,
}
