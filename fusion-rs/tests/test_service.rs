use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

use common::{
    Algorithm, Clock, Payload, Sample, SampleCallback, SampleSource, SourceError, SourceFamily,
    StreamEvent, StreamGroup, StreamId, SubscriptionHandle,
};
use fusion_rs::{ElevationService, FusionConfig, FusionError};
use sources_rs::ScriptedSource;
use test_utils::csv_loader::{load_csv_columns, CsvColumnMapper};
use test_utils::{SinkMock, TILT_READINGS};

const TOLERANCE: f32 = 1e-3;

/// Accelerometer and gyroscope rows of the tilt fixture.
static TILT: Lazy<(Vec<Sample>, Vec<Sample>)> = Lazy::new(|| {
    let mut accel_columns = CsvColumnMapper::new();
    accel_columns.add_timestamp().add_accel();
    let mut gyro_columns = CsvColumnMapper::new();
    gyro_columns.add_timestamp().add_gyro();
    (
        load_csv_columns::<Sample>(TILT_READINGS, &accel_columns.columns()).unwrap(),
        load_csv_columns::<Sample>(TILT_READINGS, &gyro_columns.columns()).unwrap(),
    )
});

struct Harness {
    service: ElevationService,
    internal: Arc<ScriptedSource>,
    external: Arc<ScriptedSource>,
}

fn harness() -> Harness {
    let internal = Arc::new(ScriptedSource::new(SourceFamily::Internal));
    let external = Arc::new(ScriptedSource::new(SourceFamily::External));
    let sources: Vec<Arc<dyn SampleSource>> = vec![internal.clone(), external.clone()];
    let service = ElevationService::new(sources, FusionConfig::default(), Clock::new()).unwrap();
    Harness {
        service,
        internal,
        external,
    }
}

/// Keeps every callback it was ever given and keeps calling them, like a transport that
/// delivers in-flight samples after an unsubscribe.
#[derive(Default)]
struct LeakySource {
    callbacks: Mutex<Vec<SampleCallback>>,
}

impl LeakySource {
    fn emit(&self, stream_id: StreamId, payload: Payload, timestamp: i64) {
        let callbacks = self.callbacks.lock().unwrap().clone();
        for callback in callbacks {
            callback(stream_id, payload, timestamp);
        }
    }
}

#[async_trait]
impl SampleSource for LeakySource {
    fn family(&self) -> SourceFamily {
        SourceFamily::Internal
    }

    async fn subscribe(
        &self,
        stream_id: StreamId,
        callback: SampleCallback,
    ) -> Result<SubscriptionHandle, SourceError> {
        self.callbacks.lock().unwrap().push(callback);
        Ok(SubscriptionHandle::new(stream_id))
    }

    async fn unsubscribe(&self, _handle: SubscriptionHandle) {}
}

#[tokio::test]
async fn test_vertical_sample_gives_alpha_times_ninety() {
    let h = harness();
    h.service
        .start(StreamId::InternalAcceleration)
        .await
        .unwrap();
    h.internal.emit(
        StreamId::InternalAcceleration,
        Payload::orientation(0.0, 0.0, 1.0),
        0,
    );

    let ewma = h
        .service
        .snapshot()
        .angle(SourceFamily::Internal, Algorithm::Ewma)
        .map(|angle| angle.value_degrees)
        .unwrap();
    assert!((ewma - 0.9 * 90.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_duplicate_start_keeps_one_subscription() {
    let h = harness();
    h.service
        .start(StreamId::ExternalAcceleration)
        .await
        .unwrap();
    assert_eq!(
        h.service.start(StreamId::ExternalAcceleration).await,
        Err(FusionError::AlreadyRunning(StreamId::ExternalAcceleration))
    );
    assert_eq!(h.external.subscribe_calls(), 1);
    assert_eq!(h.external.active_subscriptions(), 1);
}

#[tokio::test]
async fn test_duplicate_start_does_not_reset_filter() {
    let h = harness();
    h.service
        .start(StreamId::InternalAcceleration)
        .await
        .unwrap();
    h.internal.emit(
        StreamId::InternalAcceleration,
        Payload::orientation(0.0, 0.0, 1.0),
        0,
    );
    let _ = h.service.start(StreamId::InternalAcceleration).await;
    h.internal.emit(
        StreamId::InternalAcceleration,
        Payload::orientation(0.0, 0.0, 1.0),
        1,
    );

    let ewma = h
        .service
        .snapshot()
        .angle(SourceFamily::Internal, Algorithm::Ewma)
        .map(|angle| angle.value_degrees)
        .unwrap();
    assert!((ewma - (0.9 * 90.0 + 0.1 * 81.0)).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_double_stop_is_noop() {
    let h = harness();
    h.service.start(StreamId::ExternalHeartRate).await.unwrap();
    assert_eq!(h.service.stop(StreamId::ExternalHeartRate).await, Ok(()));
    assert_eq!(h.service.stop(StreamId::ExternalHeartRate).await, Ok(()));
    assert!(!h.service.is_running(StreamId::ExternalHeartRate));
    assert_eq!(h.external.active_subscriptions(), 0);
}

#[tokio::test]
async fn test_ewma_follows_sample_order() {
    let h = harness();
    h.service
        .start(StreamId::InternalAcceleration)
        .await
        .unwrap();
    let sink: SinkMock<StreamId, StreamEvent> = SinkMock::new();
    sink.attach_listener(
        h.service.coordinator().publishers(),
        &StreamId::InternalAcceleration,
    )
    .unwrap();

    // Raw angles of 45, 0 and -45 degrees.
    let samples = [(1.0, 0.0, 1.0), (0.0, 1.0, 0.0), (1.0, 0.0, -1.0)];
    for (t, (x, y, z)) in samples.into_iter().enumerate() {
        h.internal.emit(
            StreamId::InternalAcceleration,
            Payload::orientation(x, y, z),
            t as i64,
        );
    }

    let ewma: Vec<f32> = sink
        .received_on(&StreamId::InternalAcceleration)
        .iter()
        .filter_map(|event| match **event {
            StreamEvent::Angle(angle) if angle.algorithm == Algorithm::Ewma => {
                Some(angle.value_degrees)
            }
            _ => None,
        })
        .collect();

    let y1 = 0.9 * 45.0;
    let y2 = 0.1 * y1;
    let y3 = 0.9 * -45.0 + 0.1 * y2;
    assert_eq!(ewma.len(), 3);
    assert!((ewma[0] - y1).abs() < TOLERANCE);
    assert!((ewma[1] - y2).abs() < TOLERANCE);
    assert!((ewma[2] - y3).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_stale_subscription_is_discarded() {
    let source = Arc::new(LeakySource::default());
    let sources: Vec<Arc<dyn SampleSource>> = vec![source.clone()];
    let service = ElevationService::new(sources, FusionConfig::default(), Clock::new()).unwrap();
    let sink: SinkMock<StreamId, StreamEvent> = SinkMock::new();
    sink.attach_listener(
        service.coordinator().publishers(),
        &StreamId::InternalAngularVelocity,
    )
    .unwrap();

    service
        .start(StreamId::InternalAngularVelocity)
        .await
        .unwrap();
    service
        .stop(StreamId::InternalAngularVelocity)
        .await
        .unwrap();
    source.emit(
        StreamId::InternalAngularVelocity,
        Payload::orientation(0.1, 0.2, 0.3),
        1,
    );
    assert!(sink.is_empty());

    // Only the callback of the current subscription gets through.
    service
        .start(StreamId::InternalAngularVelocity)
        .await
        .unwrap();
    source.emit(
        StreamId::InternalAngularVelocity,
        Payload::orientation(0.1, 0.2, 0.3),
        2,
    );
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_group_start_rolls_back() {
    let h = harness();
    h.external
        .set_failing(StreamId::ExternalAngularVelocity, "characteristic missing");

    let result = h.service.start_group(StreamGroup::ExternalImu).await;
    assert!(matches!(
        result,
        Err(FusionError::SubscriptionFailed {
            stream_id: StreamId::ExternalAngularVelocity,
            ..
        })
    ));
    assert!(h.service.running_streams().is_empty());
    assert_eq!(h.external.active_subscriptions(), 0);
    assert!(!h.service.snapshot().measuring);
}

#[tokio::test]
async fn test_group_stop() {
    let h = harness();
    h.service
        .start_group(StreamGroup::InternalImu)
        .await
        .unwrap();
    h.service.start(StreamId::ExternalHeartRate).await.unwrap();

    h.service
        .stop_group(StreamGroup::InternalImu)
        .await
        .unwrap();
    assert_eq!(
        h.service.running_streams(),
        vec![StreamId::ExternalHeartRate]
    );
    assert_eq!(h.internal.active_subscriptions(), 0);
    assert!(h.service.snapshot().measuring);
}

#[tokio::test]
async fn test_connection_flag_reaches_subscribers() {
    let h = harness();
    let mut receiver = h.service.subscribe();

    h.external.set_connected(true);
    receiver.changed().await.unwrap();
    assert!(receiver.borrow_and_update().connected);

    h.external.set_connected(false);
    receiver.changed().await.unwrap();
    assert!(!receiver.borrow_and_update().connected);
}

#[tokio::test]
async fn test_replayed_tilt_converges() {
    let h = harness();
    h.service
        .start_group(StreamGroup::InternalImu)
        .await
        .unwrap();

    let (accel, gyro) = &*TILT;
    for (a, g) in accel.iter().zip(gyro.iter()) {
        h.internal
            .emit_sample(StreamId::InternalAngularVelocity, *g);
        h.internal.emit_sample(StreamId::InternalAcceleration, *a);
    }

    let snapshot = h.service.snapshot();
    let ewma = snapshot
        .angle(SourceFamily::Internal, Algorithm::Ewma)
        .unwrap();
    assert!((ewma.value_degrees - 30.0).abs() < TOLERANCE);
    assert_eq!(Some(ewma.timestamp), accel.last().map(|s| s.timestamp()));
    assert!(snapshot
        .angle(SourceFamily::External, Algorithm::Ewma)
        .is_none());
}
