use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use publisher::{listener, PublisherError, PublisherManager};

type MockCallback<S, T> = Arc<Option<Arc<dyn Fn(S, Arc<T>) + Send + Sync>>>;

/// Listener that records every event it receives, tagged with the topic it was
/// attached to.
pub struct SinkMock<S, T> {
    control: Arc<Mutex<HashMap<Uuid, S>>>,
    received: Arc<Mutex<Vec<(S, Arc<T>)>>>,
    callback: MockCallback<S, T>,
}

impl<S, T> Clone for SinkMock<S, T> {
    fn clone(&self) -> Self {
        Self {
            control: self.control.clone(),
            received: self.received.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<S, T> Default for SinkMock<S, T> {
    fn default() -> Self {
        Self {
            control: Arc::new(Mutex::new(HashMap::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            callback: Arc::new(None),
        }
    }
}

impl<S, T> SinkMock<S, T>
where
    S: Send + Sync + Hash + Eq + Clone + 'static,
    T: Send + Sync + 'static,
    for<'a> &'a S: Into<usize>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_callback<F>(&mut self, callback: F)
    where
        F: Fn(S, Arc<T>) + Send + Sync + 'static,
    {
        self.callback = Arc::new(Some(Arc::new(callback)));
    }

    pub fn attach_listener(
        &self,
        manager: &PublisherManager<T, S>,
        topic: &S,
    ) -> Result<Uuid, PublisherError> {
        let mut listener = listener!(self.process_samples);
        let id = manager.add_listener(&mut listener, topic)?;
        self.control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, topic.clone());
        Ok(id)
    }

    pub fn detach_listener(&self, manager: &PublisherManager<T, S>, id: Uuid) {
        let _ = manager.remove_listener(id);
        self.control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn process_samples(&self, id: Uuid, value: Arc<T>) {
        let topic = self
            .control
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        // The id is recorded after add_listener returns, so anything racing ahead of
        // it is dropped.
        if let Some(topic) = topic {
            if let Some(cb) = self.callback.as_ref() {
                cb(topic.clone(), value.clone());
            }
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((topic, value));
        }
    }

    pub fn received(&self) -> Vec<(S, Arc<T>)> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn received_on(&self, topic: &S) -> Vec<Arc<T>> {
        self.received()
            .into_iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S, T> std::fmt::Debug for SinkMock<S, T>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkMock")
            .field("control", &self.control)
            .field("callback", &"<callback_fn>")
            .finish()
    }
}
