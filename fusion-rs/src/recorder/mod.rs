pub mod export;
pub mod session;

pub use export::{zip_series, ExportTable};
pub use session::{FinalizeReason, RecordingSession};

use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{oneshot, Notify};
use uuid::Uuid;

use common::{Clock, StreamEvent};

use crate::errors::FusionError;
use crate::traits::{EventSink, StreamControl};

/// Receipt of a recording started with [`Recorder::begin`].
pub struct RecordingTicket {
    id: Uuid,
    receiver: oneshot::Receiver<RecordingSession>,
}

impl RecordingTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the session to elapse. Resolves to `None` when the session was
    /// finalized explicitly, since the caller of `finalize` already received it.
    pub async fn wait(self) -> Option<RecordingSession> {
        self.receiver.await.ok()
    }
}

struct ActiveRecording {
    session: RecordingSession,
    elapsed_tx: Option<oneshot::Sender<RecordingSession>>,
    cancel: Arc<Notify>,
}

enum Tick {
    Pending,
    Due,
    Gone,
}

/// Owner of at most one [`RecordingSession`].
///
/// A session is finalized either explicitly or by a tick task once its duration has
/// elapsed. Both paths take the session out of the same lock, so exactly one of them
/// wins; the winner stops every running stream.
pub struct Recorder {
    clock: Clock,
    tick: Duration,
    active: Mutex<Option<ActiveRecording>>,
}

impl Recorder {
    pub fn new(clock: Clock, tick_ms: u64) -> Self {
        Self {
            clock,
            tick: Duration::from_millis(tick_ms.max(1)),
            active: Mutex::new(None),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.lock().is_some()
    }

    pub fn active_session_id(&self) -> Option<Uuid> {
        self.lock().as_ref().map(|active| active.session.id())
    }

    /// Starts a session of `duration_ms` and spawns the task that finalizes it once
    /// due. Must be called from within a tokio runtime.
    pub fn begin(
        self: &Arc<Self>,
        duration_ms: i64,
        control: Arc<dyn StreamControl>,
    ) -> Result<RecordingTicket, FusionError> {
        if duration_ms <= 0 {
            return Err(FusionError::InvalidDuration(duration_ms));
        }

        let (elapsed_tx, receiver) = oneshot::channel();
        let cancel = Arc::new(Notify::new());
        let id = {
            let mut active = self.lock();
            if active.is_some() {
                warn!("Recording requested while another one is in progress");
                return Err(FusionError::AlreadyRecording);
            }
            let session = RecordingSession::new(self.clock.now_ms(), duration_ms);
            let id = session.id();
            *active = Some(ActiveRecording {
                session,
                elapsed_tx: Some(elapsed_tx),
                cancel: cancel.clone(),
            });
            id
        };

        info!("Recording {} started for {} ms", id, duration_ms);
        tokio::spawn(self.clone().run_ticks(id, cancel, control));
        Ok(RecordingTicket { id, receiver })
    }

    /// Ends the active session now and stops every running stream.
    pub async fn finalize(
        &self,
        control: &dyn StreamControl,
    ) -> Result<RecordingSession, FusionError> {
        let (session, _) = self
            .take(None, FinalizeReason::Explicit)
            .ok_or(FusionError::NotRecording)?;
        info!(
            "Recording {} finalized with {} entries",
            session.id(),
            session.len()
        );
        control.stop_all().await;
        Ok(session)
    }

    /// Appends `event` to the active session. Ignored while idle.
    pub fn offer(&self, event: &StreamEvent) {
        if let Some(active) = self.lock().as_mut() {
            active.session.append(event);
        }
    }

    async fn run_ticks(
        self: Arc<Self>,
        id: Uuid,
        cancel: Arc<Notify>,
        control: Arc<dyn StreamControl>,
    ) {
        let mut interval = tokio::time::interval(self.tick);
        loop {
            tokio::select! {
                _ = cancel.notified() => {
                    debug!("Recording {} tick loop cancelled", id);
                    return;
                }
                _ = interval.tick() => match self.poll(id) {
                    Tick::Pending => continue,
                    Tick::Due => break,
                    Tick::Gone => return,
                },
            }
        }

        let Some((session, elapsed_tx)) = self.take(Some(id), FinalizeReason::Elapsed) else {
            return;
        };
        info!(
            "Recording {} elapsed with {} entries",
            session.id(),
            session.len()
        );
        control.stop_all().await;
        if let Some(elapsed_tx) = elapsed_tx {
            if elapsed_tx.send(session).is_err() {
                warn!("Recording {} elapsed but nobody is waiting for it", id);
            }
        }
    }

    fn poll(&self, id: Uuid) -> Tick {
        match self.lock().as_ref() {
            Some(active) if active.session.id() == id => {
                if active.session.is_due(self.clock.now_ms()) {
                    Tick::Due
                } else {
                    Tick::Pending
                }
            }
            _ => Tick::Gone,
        }
    }

    /// Moves the active session out, optionally only if it is the one with `id`.
    fn take(
        &self,
        id: Option<Uuid>,
        reason: FinalizeReason,
    ) -> Option<(RecordingSession, Option<oneshot::Sender<RecordingSession>>)> {
        let mut active = self.lock();
        if let (Some(id), Some(current)) = (id, active.as_ref()) {
            if current.session.id() != id {
                return None;
            }
        }
        let ActiveRecording {
            mut session,
            elapsed_tx,
            cancel,
        } = active.take()?;
        session.close(self.clock.now_ms(), reason);
        cancel.notify_one();
        Some((session, elapsed_tx))
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveRecording>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for Recorder {
    fn on_event(&self, event: &StreamEvent) {
        self.offer(event);
    }
}
