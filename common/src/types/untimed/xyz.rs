use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use std::ops::{Add, Mul};

use crate::constants::N_XYZ_COORDINATES;

/// 3-axis reading: linear acceleration or angular velocity depending on the stream.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct XYZ(Vector3<f32>);

impl XYZ {
    pub fn new(data: [f32; N_XYZ_COORDINATES]) -> Self {
        Self(Vector3::from(data))
    }

    pub fn zeros() -> Self {
        Self(Vector3::zeros())
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn z(&self) -> f32 {
        self.0.z
    }

    pub fn inner(&self) -> [f32; N_XYZ_COORDINATES] {
        [self.0.x, self.0.y, self.0.z]
    }

    /// Magnitude of the projection on the x/y plane.
    pub fn horizontal_norm(&self) -> f32 {
        self.0.xy().norm()
    }

    pub fn norm(&self) -> f32 {
        self.0.norm()
    }
}

impl From<XYZ> for [f32; N_XYZ_COORDINATES] {
    fn from(value: XYZ) -> Self {
        value.inner()
    }
}

impl From<[f32; N_XYZ_COORDINATES]> for XYZ {
    fn from(value: [f32; N_XYZ_COORDINATES]) -> Self {
        Self::new(value)
    }
}

impl From<(f32, f32, f32)> for XYZ {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new([x, y, z])
    }
}

impl TryFrom<Vec<f32>> for XYZ {
    type Error = &'static str;

    fn try_from(value: Vec<f32>) -> Result<Self, Self::Error> {
        if value.len() != N_XYZ_COORDINATES {
            return Err("Can't convert to XYZ");
        }
        Ok(Self(Vector3::from_vec(value)))
    }
}

impl Add for XYZ {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f32> for XYZ {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self(self.0 * rhs)
    }
}
