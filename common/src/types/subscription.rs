use std::fmt;
use uuid::Uuid;

use crate::types::StreamId;

/// Receipt returned by a source for an active subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: Uuid,
    stream_id: StreamId,
}

impl SubscriptionHandle {
    pub fn new(stream_id: StreamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream_id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.stream_id, self.id)
    }
}
