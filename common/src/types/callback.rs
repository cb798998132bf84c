use std::sync::Arc;
use uuid::Uuid;

use crate::types::{Payload, StreamId};

/// Listener callback used by the publisher: listener id plus shared event.
pub type Callback<T> = Arc<dyn Fn(Uuid, Arc<T>) + Send + Sync>;

/// Sample delivery callback handed to a `SampleSource`: `(stream_id, payload, timestamp_ms)`.
pub type SampleCallback = Arc<dyn Fn(StreamId, Payload, i64) + Send + Sync>;

/// Connection-state observer handed to a `SampleSource`.
pub type ConnectionCallback = Arc<dyn Fn(bool) + Send + Sync>;
