use async_trait::async_trait;

use crate::errors::SourceError;
use crate::types::{ConnectionCallback, SampleCallback, SourceFamily, StreamId, SubscriptionHandle};

/// Capability offered by a sensor collaborator (external wearable or host sensors).
///
/// Once subscribed, a stream delivers `(stream_id, payload, timestamp_ms)` through the
/// injected callback until it is unsubscribed. The callback may be invoked from any
/// thread, but samples of a single stream must be delivered in arrival order.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Which side of the system this source feeds.
    fn family(&self) -> SourceFamily;

    /// Begins delivery of `stream_id` samples through `callback`.
    async fn subscribe(
        &self,
        stream_id: StreamId,
        callback: SampleCallback,
    ) -> Result<SubscriptionHandle, SourceError>;

    /// Stops delivery. Must be a no-op when delivery already ended.
    async fn unsubscribe(&self, handle: SubscriptionHandle);

    /// Registers an observer of the device connection flag. Sources without a
    /// connection notion ignore it.
    fn on_connection_change(&self, _callback: ConnectionCallback) {}
}
