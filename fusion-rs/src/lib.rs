//! # Crate fusion_rs
//!
//! ## fusion_rs
//!
//! The `fusion_rs` crate turns motion samples from two independent sources (an external
//! wearable and the host's own sensors) into elevation-angle estimates and one
//! consistent, observable state.
//!
//! Features include:
//! - Independent start/stop of every sample stream, with at most one live subscription
//!   per stream and no delivery after `stop` returns.
//! - Two elevation estimates (EWMA and complementary filter) per acceleration sample.
//! - A latest-value [`AggregateState`] snapshot, observable through a `watch` channel.
//! - Time-bounded recordings that end themselves, stop the streams and can be flattened
//!   into columns for export.
//! - Per-stream listeners for every raw sample and angle estimate.
//!
//! Configuration is read from JSON through [`FusionConfig`]; logging goes through the
//! `log` facade and can be initialised with [`logging::init`].

pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod logging;
pub mod recorder;
pub mod service;
pub mod traits;

pub use aggregator::{AggregateState, Aggregator};
pub use config::{FilterConfig, FusionConfig, RecordingConfig};
pub use coordinator::StreamCoordinator;
pub use errors::{ConfigError, FusionError};
pub use recorder::{
    zip_series, ExportTable, FinalizeReason, Recorder, RecordingSession, RecordingTicket,
};
pub use service::ElevationService;
pub use traits::{EventSink, StreamControl};
