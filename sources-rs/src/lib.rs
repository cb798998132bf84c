//! # Crate sources_rs
//!
//! Sample sources implementing [`common::SampleSource`].
//!
//! - [`ScriptedSource`] delivers exactly what the caller pushes. Streams can be marked
//!   unavailable or failing, subscriptions are counted and the connection flag can be
//!   flipped by hand. It stands in for a wearable or host sensor stack in tests.
//! - [`SimulatedSource`] generates a steady tilt at a fixed period: gravity projected on
//!   the configured elevation angle, a small angular velocity and (for the external
//!   family) a heart rate, with optional Gaussian noise.
//!
//! [`services::run_simulated_source`] spawns the generator loop and hands back the
//! source so it can be plugged into a coordinator.

pub(crate) mod adapters;
mod errors;
pub(crate) mod models;
pub mod services;

pub use adapters::scripted::ScriptedSource;
pub use adapters::simulated::{SimulatedSource, SimulationConfig};
pub use errors::SimulationError;
