use common::{Clock, Payload, SampleSource, SourceFamily, StreamId};
use sources_rs::services::run_simulated_source;
use sources_rs::{SimulatedSource, SimulationConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Received = Arc<Mutex<Vec<(StreamId, Payload, i64)>>>;

fn recording_callback(received: Received) -> common::SampleCallback {
    Arc::new(move |stream_id: StreamId, payload: Payload, timestamp: i64| {
        received.lock().unwrap().push((stream_id, payload, timestamp));
    })
}

#[tokio::test(start_paused = true)]
async fn test_receive_external_streams() {
    let clock = Clock::new();
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let (handle, source) = run_simulated_source(
        SourceFamily::External,
        SimulationConfig {
            period_millis: 50,
            ..Default::default()
        },
        clock,
        Some(500),
    )
    .unwrap();

    for stream_id in [
        StreamId::ExternalHeartRate,
        StreamId::ExternalAcceleration,
        StreamId::ExternalAngularVelocity,
    ] {
        source
            .subscribe(stream_id, recording_callback(received.clone()))
            .await
            .unwrap();
    }

    handle.await.unwrap();

    let received = received.lock().unwrap();
    assert!(!received.is_empty());
    for stream_id in [
        StreamId::ExternalHeartRate,
        StreamId::ExternalAcceleration,
        StreamId::ExternalAngularVelocity,
    ] {
        let timestamps: Vec<i64> = received
            .iter()
            .filter(|(s, _, _)| *s == stream_id)
            .map(|(_, _, t)| *t)
            .collect();
        assert!(!timestamps.is_empty());
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }
    assert!(received
        .iter()
        .all(|(stream_id, payload, _)| payload.matches(*stream_id)));
}

#[tokio::test(start_paused = true)]
async fn test_generated_tilt_matches_config() {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let source = Arc::new(
        SimulatedSource::new(
            SourceFamily::Internal,
            SimulationConfig {
                elevation_degrees: -20.0,
                ..Default::default()
            },
        )
        .unwrap(),
    );
    source
        .subscribe(
            StreamId::InternalAcceleration,
            recording_callback(received.clone()),
        )
        .await
        .unwrap();

    let handle = tokio::spawn({
        let source = source.clone();
        async move { source.start(None).await }
    });
    tokio::time::sleep(Duration::from_millis(30)).await;
    source.stop();
    handle.await.unwrap();

    let received = received.lock().unwrap();
    let (_, payload, _) = received.first().unwrap();
    let a = payload.as_xyz().unwrap();
    let elevation = a.z().atan2(a.horizontal_norm()).to_degrees();
    assert!((elevation + 20.0).abs() < 1e-3);
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribed_stream_is_silent() {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let (handle, source) = run_simulated_source(
        SourceFamily::Internal,
        SimulationConfig::default(),
        Clock::new(),
        Some(200),
    )
    .unwrap();

    let subscription = source
        .subscribe(
            StreamId::InternalAngularVelocity,
            recording_callback(received.clone()),
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    source.unsubscribe(subscription).await;
    let count_after_unsubscribe = received.lock().unwrap().len();

    handle.await.unwrap();
    assert!(count_after_unsubscribe > 0);
    assert_eq!(received.lock().unwrap().len(), count_after_unsubscribe);
    assert_eq!(source.active_subscriptions(), 0);
}
