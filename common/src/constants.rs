pub const N_XYZ_COORDINATES: usize = 3;

/// Vectors shorter than this have no direction; filters map them to `0.0`.
pub const MAGNITUDE_EPSILON: f32 = 1e-6;

pub const N_STREAMS: usize = 5;
