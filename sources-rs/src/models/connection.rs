use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use common::ConnectionCallback;

/// Connection flag plus the observers interested in it.
pub(crate) struct Connection {
    connected: AtomicBool,
    observers: Mutex<Vec<ConnectionCallback>>,
}

impl Connection {
    pub(crate) fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Registers `callback` and immediately reports the current state to it.
    pub(crate) fn observe(&self, callback: ConnectionCallback) {
        callback(self.is_connected());
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }

    /// Updates the flag and notifies observers when it changed.
    pub(crate) fn set(&self, connected: bool) {
        if self.connected.swap(connected, Ordering::SeqCst) == connected {
            return;
        }
        log::info!("Connection state changed: connected={}", connected);
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(connected);
        }
    }
}
