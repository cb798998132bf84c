use std::sync::Arc;
use uuid::Uuid;

use common::traits::Notifiable;
use common::types::Callback;

/// Listener wrapping a synchronous callback. Callbacks run on the notifier's thread
/// (or a rayon worker), so they must not block.
#[derive(Clone)]
pub struct Listener<T> {
    callback: Callback<T>,
    id: Option<Uuid>,
}

impl<T> Listener<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Uuid, Arc<T>) + Send + Sync + 'static,
    {
        Listener {
            callback: Arc::new(callback),
            id: None,
        }
    }
}

impl<T> Notifiable<T> for Listener<T> {
    fn get_callback(&self) -> Callback<T> {
        self.callback.clone()
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    fn get_id(&self) -> Option<Uuid> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener;
    use std::sync::Mutex;

    struct TestHandler {
        data: Arc<Mutex<Vec<i32>>>,
    }

    impl TestHandler {
        fn new() -> Self {
            Self {
                data: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn handle(&self, _id: Uuid, value: Arc<i32>) {
            self.data.lock().unwrap().push(*value);
        }
    }

    #[test]
    fn test_new_listener() {
        let listener = Listener::new(|_id: Uuid, value: Arc<i32>| {
            assert_eq!(*value, 42);
        });

        let callback = listener.get_callback();
        callback(Uuid::new_v4(), Arc::new(42));
        assert!(listener.get_id().is_none());
    }

    #[test]
    fn test_listener_with_macro() {
        let handler = Arc::new(TestHandler::new());

        let mut listener = listener!(handler.handle);
        let id = Uuid::new_v4();
        listener.set_id(id);

        let callback = listener.get_callback();
        callback(id, Arc::new(400));
        callback(id, Arc::new(401));

        assert_eq!(listener.get_id(), Some(id));
        assert_eq!(*handler.data.lock().unwrap(), vec![400, 401]);
    }
}
