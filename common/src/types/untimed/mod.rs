pub mod payload;
pub mod xyz;

pub use crate::types::untimed::payload::Payload;
pub use crate::types::untimed::xyz::XYZ;
