use tokio::time::Instant;

/// Monotonic millisecond clock with an arbitrary epoch (the moment it was created).
///
/// Built on `tokio::time::Instant` so a paused test runtime drives it together with
/// timers.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
