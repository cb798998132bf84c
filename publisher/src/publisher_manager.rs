use dashmap::DashMap;
use std::cmp::Eq;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::publisher::{Publishable, Publisher};
use common::traits::Notifiable;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PublisherError {
    #[error("Publisher doesnt exist")]
    PublisherNotFound,
    #[error("Listener Id not found: {0}")]
    ListenerNotFound(Uuid),
}

/// Keeps one [`Publisher`] per topic `S` and remembers which topic each listener id
/// was registered on, so a listener can be removed by id alone.
pub struct PublisherManager<T, S> {
    publishers: Arc<DashMap<S, Publisher<T>>>,
    control: Arc<DashMap<Uuid, S>>,
}

impl<T, S> Clone for PublisherManager<T, S> {
    fn clone(&self) -> Self {
        Self {
            publishers: self.publishers.clone(),
            control: self.control.clone(),
        }
    }
}

impl<T, S> PublisherManager<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + Hash + Eq + Clone,
    for<'a> &'a S: Into<usize>,
{
    pub fn new(publisher_types: &[S]) -> Self {
        let collection = DashMap::<S, Publisher<T>>::new();
        for publisher_type in publisher_types {
            collection.insert(publisher_type.clone(), Publisher::new());
        }

        Self {
            publishers: Arc::new(collection),
            control: Arc::new(DashMap::new()),
        }
    }

    /// Adds a publisher for `publisher_type`. Existing listeners are kept if it is
    /// already present.
    pub fn add_publisher(&self, publisher_type: S) {
        self.publishers.entry(publisher_type).or_default();
    }

    pub fn remove_publisher(&self, publisher_type: &S) {
        if let Some((_, publisher)) = self.publishers.remove(publisher_type) {
            publisher.unregister_all();
            self.control.retain(|_, topic| *topic != *publisher_type);
        }
    }

    pub fn get_available_publisher_types(&self) -> Vec<S> {
        let mut publisher_types: Vec<S> = self
            .publishers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        publisher_types.sort_by_key(|publisher_type| Into::<usize>::into(publisher_type));
        publisher_types
    }

    pub fn add_listener(
        &self,
        listener: &mut dyn Notifiable<T>,
        publisher_type: &S,
    ) -> Result<Uuid, PublisherError> {
        let publisher = self
            .publishers
            .get(publisher_type)
            .ok_or(PublisherError::PublisherNotFound)?;
        let id = publisher.register_listener(listener);
        self.control.insert(id, publisher_type.clone());
        Ok(id)
    }

    pub fn remove_listener(&self, id: Uuid) -> Result<(), PublisherError> {
        let (_, publisher_type) = self
            .control
            .remove(&id)
            .ok_or(PublisherError::ListenerNotFound(id))?;
        let publisher = self
            .publishers
            .get(&publisher_type)
            .ok_or(PublisherError::PublisherNotFound)?;
        publisher.unregister_listener(id);
        Ok(())
    }

    pub fn notify_listeners(&self, publisher_type: &S, data: Arc<T>) {
        // Clone out of the map so no shard lock is held while callbacks run.
        let publisher = self
            .publishers
            .get(publisher_type)
            .map(|entry| entry.value().clone());
        if let Some(publisher) = publisher {
            publisher.notify_listeners(data);
        }
    }

    pub fn listener_count(&self, publisher_type: &S) -> usize {
        self.publishers
            .get(publisher_type)
            .map(|publisher| publisher.len())
            .unwrap_or(0)
    }
}
