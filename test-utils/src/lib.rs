//! Fixtures shared by the workspace tests: a CSV loader for recorded tilt sessions and
//! a sink that captures whatever a `PublisherManager` fans out.

pub mod csv_loader;
pub mod sink_mock;

pub use sink_mock::SinkMock;

/// Recorded tilt sweep: 50 rows at 20 ms, ramping from 0 to 30 degrees over the first
/// 25 rows and holding 30 degrees afterwards.
pub const TILT_READINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/tilt_readings.csv");
