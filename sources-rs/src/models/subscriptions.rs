use dashmap::DashMap;

use common::{Payload, SampleCallback, StreamId, SubscriptionHandle};

/// Active subscriptions of a source, one per stream.
#[derive(Default)]
pub(crate) struct Subscriptions {
    active: DashMap<StreamId, (SubscriptionHandle, SampleCallback)>,
}

impl Subscriptions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `stream_id`, replacing any previous subscription.
    pub(crate) fn insert(&self, stream_id: StreamId, callback: SampleCallback) -> SubscriptionHandle {
        let handle = SubscriptionHandle::new(stream_id);
        if self.active.insert(stream_id, (handle, callback)).is_some() {
            log::warn!("Replacing active subscription on {}", stream_id);
        }
        handle
    }

    /// Removes the subscription only if `handle` is still the current one.
    pub(crate) fn remove(&self, handle: &SubscriptionHandle) -> bool {
        self.active
            .remove_if(&handle.stream_id(), |_, (current, _)| current.id() == handle.id())
            .is_some()
    }

    pub(crate) fn contains(&self, stream_id: StreamId) -> bool {
        self.active.contains_key(&stream_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn streams(&self) -> Vec<StreamId> {
        let mut streams: Vec<StreamId> = self.active.iter().map(|entry| *entry.key()).collect();
        streams.sort();
        streams
    }

    /// Hands the payload to the subscriber of `stream_id`. Returns false when nobody
    /// listens.
    pub(crate) fn deliver(&self, stream_id: StreamId, payload: Payload, timestamp: i64) -> bool {
        // Clone out so the callback never runs under a shard lock.
        let callback = self
            .active
            .get(&stream_id)
            .map(|entry| entry.value().1.clone());
        match callback {
            Some(callback) => {
                callback(stream_id, payload, timestamp);
                true
            }
            None => false,
        }
    }
}
