//! # Crate elevation_rs
//!
//! Elevation-angle estimators fed with 3-axis samples.
//!
//! * [`EwmaElevation`] turns an acceleration triple into the angle between the gravity
//!   vector and the horizontal plane, and smooths it with an exponentially-weighted
//!   moving average. It keeps the last filtered value between calls.
//! * [`ComplementaryElevation`] blends acceleration with angular velocity axis by axis
//!   and derives the angle from the blended vector. It keeps no history.
//!
//! Both return signed degrees. Degenerate inputs (magnitudes below
//! [`common::constants::MAGNITUDE_EPSILON`]) yield exactly `0.0`; a vertical acceleration
//! is a well-defined ±90°.
//!
//! ```
//! use elevation_rs::EwmaElevation;
//!
//! let mut filter = EwmaElevation::new(0.9).unwrap();
//! let angle = filter.update(0.0, 1.0, 1.0);
//! assert!((angle - 0.9 * 45.0).abs() < 1e-4);
//! ```

mod complementary;
mod errors;
mod ewma;
mod utils;

pub use complementary::ComplementaryElevation;
pub use errors::FilterError;
pub use ewma::EwmaElevation;
