//! General functionality shared by the elevation workspace: stream identities,
//! sample payloads, angle estimates and the port a sample source implements.

pub mod constants;
pub mod errors;

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

// Re-export traits
#[doc(inline)]
pub use traits::{Notifiable, SampleSource};

// Re-export types
#[doc(inline)]
pub use errors::SourceError;
#[doc(inline)]
pub use types::{
    Algorithm, AngleEstimate, Clock, ConnectionCallback, Payload, Sample, SampleCallback,
    SourceFamily, StreamEvent, StreamGroup, StreamId, StreamKind, SubscriptionHandle, XYZ,
};
