//! # Crate publisher
//!
//! ## publisher
//!
//! The `publisher` crate keeps registries of listeners and fans events of type `T` out
//! to them.
//!
//! A [`Publisher`] owns the listeners of a single topic. A [`PublisherManager`] keys one
//! publisher per topic (for instance per stream) so consumers can listen to exactly the
//! feeds they care about.
//!
//! ### Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use uuid::Uuid;
//! use common::StreamId;
//! use publisher::{Listener, PublisherManager};
//!
//! let manager = PublisherManager::<f32, StreamId>::new(&[StreamId::InternalAcceleration]);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let mut listener = Listener::new({
//!     let seen = seen.clone();
//!     move |_id: Uuid, value: Arc<f32>| seen.lock().unwrap().push(*value)
//! });
//! let id = manager
//!     .add_listener(&mut listener, &StreamId::InternalAcceleration)
//!     .unwrap();
//!
//! manager.notify_listeners(&StreamId::InternalAcceleration, Arc::new(9.0));
//! manager.remove_listener(id).unwrap();
//! manager.notify_listeners(&StreamId::InternalAcceleration, Arc::new(1.0));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![9.0]);
//! ```

pub mod listener;
pub mod macros;
pub mod publisher;
pub mod publisher_manager;

pub use listener::Listener;
pub use publisher::{Publishable, Publisher};
pub use publisher_manager::{PublisherError, PublisherManager};
