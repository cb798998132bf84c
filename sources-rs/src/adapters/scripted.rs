use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use common::{
    ConnectionCallback, Payload, Sample, SampleCallback, SampleSource, SourceError, SourceFamily,
    StreamId, SubscriptionHandle,
};

use crate::models::connection::Connection;
use crate::models::subscriptions::Subscriptions;

enum Fault {
    Unavailable,
    Failing(String),
}

/// Source driven by hand: samples are delivered only when [`ScriptedSource::emit`] is
/// called.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use common::{Payload, SampleSource, SourceFamily, StreamId};
/// use sources_rs::ScriptedSource;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = ScriptedSource::new(SourceFamily::Internal);
/// let received = Arc::new(AtomicUsize::new(0));
/// let callback = {
///     let received = received.clone();
///     Arc::new(move |_: StreamId, _: Payload, _: i64| {
///         received.fetch_add(1, Ordering::SeqCst);
///     })
/// };
///
/// let handle = source
///     .subscribe(StreamId::InternalAcceleration, callback)
///     .await
///     .unwrap();
/// assert!(source.emit(StreamId::InternalAcceleration, Payload::orientation(0.0, 0.0, 1.0), 0));
///
/// source.unsubscribe(handle).await;
/// assert!(!source.emit(StreamId::InternalAcceleration, Payload::orientation(0.0, 0.0, 1.0), 1));
/// assert_eq!(received.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub struct ScriptedSource {
    family: SourceFamily,
    subscriptions: Subscriptions,
    faults: DashMap<StreamId, Fault>,
    subscribe_calls: AtomicUsize,
    subscribe_delay: Mutex<Option<Duration>>,
    connection: Connection,
}

impl ScriptedSource {
    pub fn new(family: SourceFamily) -> Self {
        Self {
            family,
            subscriptions: Subscriptions::new(),
            faults: DashMap::new(),
            subscribe_calls: AtomicUsize::new(0),
            subscribe_delay: Mutex::new(None),
            connection: Connection::new(false),
        }
    }

    /// Delivers one sample to the subscriber of `stream_id`, if any.
    pub fn emit(&self, stream_id: StreamId, payload: Payload, timestamp: i64) -> bool {
        self.subscriptions.deliver(stream_id, payload, timestamp)
    }

    pub fn emit_sample(&self, stream_id: StreamId, sample: Sample) -> bool {
        self.emit(stream_id, sample.payload(), sample.timestamp())
    }

    /// Subsequent subscriptions to `stream_id` fail with `SourceUnavailable`.
    pub fn set_unavailable(&self, stream_id: StreamId) {
        self.faults.insert(stream_id, Fault::Unavailable);
    }

    /// Subsequent subscriptions to `stream_id` fail with `SubscriptionFailed`.
    pub fn set_failing(&self, stream_id: StreamId, reason: &str) {
        self.faults
            .insert(stream_id, Fault::Failing(reason.to_string()));
    }

    pub fn clear_faults(&self) {
        self.faults.clear();
    }

    /// Makes every subscribe call wait `delay` before completing.
    pub fn set_subscribe_delay(&self, delay: Option<Duration>) {
        *self
            .subscribe_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Subscribe calls that reached the source, including failed ones.
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_subscribed(&self, stream_id: StreamId) -> bool {
        self.subscriptions.contains(stream_id)
    }

    pub fn subscribed_streams(&self) -> Vec<StreamId> {
        self.subscriptions.streams()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connection.set(connected);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    fn check_faults(&self, stream_id: StreamId) -> Result<(), SourceError> {
        if stream_id.family() != self.family {
            return Err(SourceError::SourceUnavailable(stream_id));
        }
        match self.faults.get(&stream_id).as_deref() {
            Some(Fault::Unavailable) => Err(SourceError::SourceUnavailable(stream_id)),
            Some(Fault::Failing(reason)) => Err(SourceError::SubscriptionFailed {
                stream_id,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SampleSource for ScriptedSource {
    fn family(&self) -> SourceFamily {
        self.family
    }

    async fn subscribe(
        &self,
        stream_id: StreamId,
        callback: SampleCallback,
    ) -> Result<SubscriptionHandle, SourceError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self
            .subscribe_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_faults(stream_id)?;
        log::debug!("Scripted {} source subscribed to {}", self.family, stream_id);
        Ok(self.subscriptions.insert(stream_id, callback))
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) {
        if !self.subscriptions.remove(&handle) {
            log::debug!("Subscription {} already ended", handle);
        }
    }

    fn on_connection_change(&self, callback: ConnectionCallback) {
        self.connection.observe(callback);
    }
}
