pub mod angle;
pub mod event;
pub mod sample;

pub use crate::types::timed::angle::{Algorithm, AngleEstimate};
pub use crate::types::timed::event::StreamEvent;
pub use crate::types::timed::sample::Sample;
