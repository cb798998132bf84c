pub mod callback;
pub mod clock;
pub mod streams;
pub mod subscription;
pub mod timed;
pub mod untimed;

pub use crate::types::callback::{Callback, ConnectionCallback, SampleCallback};
pub use crate::types::clock::Clock;
pub use crate::types::streams::{SourceFamily, StreamGroup, StreamId, StreamKind};
pub use crate::types::subscription::SubscriptionHandle;
pub use crate::types::timed::{Algorithm, AngleEstimate, Sample, StreamEvent};
pub use crate::types::untimed::{Payload, XYZ};
