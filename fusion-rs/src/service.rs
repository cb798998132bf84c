use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use common::{Clock, Notifiable, SampleSource, StreamEvent, StreamGroup, StreamId};
use publisher::PublisherError;

use crate::aggregator::{AggregateState, Aggregator};
use crate::config::FusionConfig;
use crate::coordinator::StreamCoordinator;
use crate::errors::FusionError;
use crate::recorder::{Recorder, RecordingSession, RecordingTicket};

/// Entry point of the engine: one coordinator, its aggregate state and its recorder,
/// wired to the given sources.
///
/// ```
/// use std::sync::Arc;
/// use common::{Clock, Payload, SampleSource, SourceFamily, StreamId};
/// use fusion_rs::{ElevationService, FusionConfig};
/// use sources_rs::ScriptedSource;
///
/// # #[tokio::main]
/// # async fn main() {
/// let phone = Arc::new(ScriptedSource::new(SourceFamily::Internal));
/// let sources: Vec<Arc<dyn SampleSource>> = vec![phone.clone()];
/// let service = ElevationService::new(sources, FusionConfig::default(), Clock::new()).unwrap();
///
/// service.start(StreamId::InternalAcceleration).await.unwrap();
/// phone.emit(StreamId::InternalAcceleration, Payload::orientation(0.0, 1.0, 1.0), 0);
///
/// let snapshot = service.snapshot();
/// assert!(snapshot.measuring);
/// assert!(snapshot.internal_ewma.is_some());
/// # }
/// ```
pub struct ElevationService {
    config: FusionConfig,
    coordinator: StreamCoordinator,
}

impl ElevationService {
    /// Timestamps of recordings are taken from `clock`; share it with the sources so both
    /// sides agree on the epoch.
    pub fn new(
        sources: Vec<Arc<dyn SampleSource>>,
        config: FusionConfig,
        clock: Clock,
    ) -> Result<Self, FusionError> {
        let aggregator = Arc::new(Aggregator::new());
        let recorder = Arc::new(Recorder::new(clock, config.recording.tick_ms));
        let coordinator = StreamCoordinator::new(sources, &config, aggregator, recorder)?;
        info!("Elevation service ready");
        Ok(Self {
            config,
            coordinator,
        })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &StreamCoordinator {
        &self.coordinator
    }

    pub async fn start(&self, stream_id: StreamId) -> Result<(), FusionError> {
        self.coordinator.start(stream_id).await
    }

    pub async fn stop(&self, stream_id: StreamId) -> Result<(), FusionError> {
        self.coordinator.stop(stream_id).await
    }

    pub async fn start_group(&self, group: StreamGroup) -> Result<(), FusionError> {
        self.coordinator.start_group(group).await
    }

    pub async fn stop_group(&self, group: StreamGroup) -> Result<(), FusionError> {
        self.coordinator.stop_group(group).await
    }

    pub async fn stop_all(&self) -> Vec<StreamId> {
        self.coordinator.stop_all().await
    }

    pub fn is_running(&self, stream_id: StreamId) -> bool {
        self.coordinator.is_running(stream_id)
    }

    pub fn running_streams(&self) -> Vec<StreamId> {
        self.coordinator.running_streams()
    }

    /// Records everything produced during the next `duration_ms`. When the time is up,
    /// every running stream is stopped and the session is handed to the ticket.
    pub fn begin_recording(&self, duration_ms: i64) -> Result<RecordingTicket, FusionError> {
        self.coordinator
            .recorder()
            .begin(duration_ms, Arc::new(self.coordinator.clone()))
    }

    pub fn begin_default_recording(&self) -> Result<RecordingTicket, FusionError> {
        self.begin_recording(self.config.recording.default_duration_ms)
    }

    pub async fn finalize_recording(&self) -> Result<RecordingSession, FusionError> {
        self.coordinator
            .recorder()
            .finalize(&self.coordinator)
            .await
    }

    pub fn is_recording(&self) -> bool {
        self.coordinator.recorder().is_recording()
    }

    /// Starts `group`, records it for `duration_ms` and waits for the session.
    ///
    /// Returns `None` if the session was finalized explicitly in the meantime.
    pub async fn record(
        &self,
        group: StreamGroup,
        duration_ms: i64,
    ) -> Result<Option<RecordingSession>, FusionError> {
        self.start_group(group).await?;
        let ticket = match self.begin_recording(duration_ms) {
            Ok(ticket) => ticket,
            Err(err) => {
                warn!("Recording of {:?} refused: {}", group, err);
                self.stop_group(group).await?;
                return Err(err);
            }
        };
        Ok(ticket.wait().await)
    }

    pub fn snapshot(&self) -> AggregateState {
        self.coordinator.aggregator().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.coordinator.aggregator().subscribe()
    }

    pub fn add_listener(
        &self,
        listener: &mut dyn Notifiable<StreamEvent>,
        stream_id: StreamId,
    ) -> Result<Uuid, PublisherError> {
        self.coordinator.add_listener(listener, stream_id)
    }

    pub fn remove_listener(&self, id: Uuid) -> Result<(), PublisherError> {
        self.coordinator.remove_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Payload, SourceFamily};
    use sources_rs::ScriptedSource;

    fn service(source: Arc<ScriptedSource>) -> ElevationService {
        let sources: Vec<Arc<dyn SampleSource>> = vec![source];
        ElevationService::new(sources, FusionConfig::default(), Clock::new()).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = FusionConfig::default();
        config.external.complementary_alpha = 0.0;
        let result = ElevationService::new(Vec::new(), config, Clock::new());
        assert!(matches!(result, Err(FusionError::Filter(_))));
    }

    #[tokio::test]
    async fn test_failed_start_leaves_snapshot_untouched() {
        let source = Arc::new(ScriptedSource::new(SourceFamily::Internal));
        let service = service(source.clone());
        source.set_unavailable(StreamId::InternalAcceleration);

        let before = service.snapshot();
        assert_eq!(
            service.start(StreamId::InternalAcceleration).await,
            Err(FusionError::SourceUnavailable(StreamId::InternalAcceleration))
        );
        assert_eq!(service.snapshot(), before);
        assert!(!service.is_running(StreamId::InternalAcceleration));
    }

    #[tokio::test]
    async fn test_values_persist_after_stop() {
        let source = Arc::new(ScriptedSource::new(SourceFamily::Internal));
        let service = service(source.clone());
        service.start(StreamId::InternalAcceleration).await.unwrap();
        source.emit(
            StreamId::InternalAcceleration,
            Payload::orientation(0.0, 1.0, 1.0),
            3,
        );
        service.stop(StreamId::InternalAcceleration).await.unwrap();

        let snapshot = service.snapshot();
        assert!(!snapshot.measuring);
        assert_eq!(
            snapshot
                .latest(StreamId::InternalAcceleration)
                .map(|s| s.timestamp()),
            Some(3)
        );
        assert!(snapshot.internal_complementary.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_recording_duration() {
        let source = Arc::new(ScriptedSource::new(SourceFamily::Internal));
        let service = service(source);
        let ticket = service.begin_default_recording().unwrap();
        let session = ticket.wait().await.unwrap();
        assert_eq!(session.duration_ms(), 20_000);
        assert_eq!(session.finished_at(), Some(20_000));
    }
}
