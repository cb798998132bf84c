use async_trait::async_trait;

use common::{StreamEvent, StreamId};

/// Consumer fed synchronously by the coordinator, in production order, from inside the
/// ingestion critical section. Implementations must not block or call back into the
/// coordinator's `start`/`stop`.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &StreamEvent);
}

/// What the recorder needs from the coordinator to end a session.
#[async_trait]
pub trait StreamControl: Send + Sync {
    /// Stops every running stream and returns the ones that were stopped.
    async fn stop_all(&self) -> Vec<StreamId>;
}
