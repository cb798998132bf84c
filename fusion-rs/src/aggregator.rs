use serde::Serialize;
use std::collections::BTreeSet;
use tokio::sync::watch;

use common::{Algorithm, AngleEstimate, Sample, SourceFamily, StreamEvent, StreamId};

use crate::traits::EventSink;

/// Latest value of every feed, as a UI would display it.
///
/// Fields are merged independently: a new heart rate leaves the angles untouched, and
/// values stay in place after their stream stops.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AggregateState {
    pub heart_rate: Option<Sample>,
    pub external_acceleration: Option<Sample>,
    pub external_angular_velocity: Option<Sample>,
    pub internal_acceleration: Option<Sample>,
    pub internal_angular_velocity: Option<Sample>,
    pub external_ewma: Option<AngleEstimate>,
    pub external_complementary: Option<AngleEstimate>,
    pub internal_ewma: Option<AngleEstimate>,
    pub internal_complementary: Option<AngleEstimate>,
    pub connected: bool,
    pub measuring: bool,
    pub running: BTreeSet<StreamId>,
}

impl AggregateState {
    pub fn latest(&self, stream_id: StreamId) -> Option<&Sample> {
        self.raw_slot(stream_id).as_ref()
    }

    pub fn angle(&self, family: SourceFamily, algorithm: Algorithm) -> Option<&AngleEstimate> {
        match (family, algorithm) {
            (SourceFamily::External, Algorithm::Ewma) => self.external_ewma.as_ref(),
            (SourceFamily::External, Algorithm::Complementary) => {
                self.external_complementary.as_ref()
            }
            (SourceFamily::Internal, Algorithm::Ewma) => self.internal_ewma.as_ref(),
            (SourceFamily::Internal, Algorithm::Complementary) => {
                self.internal_complementary.as_ref()
            }
        }
    }

    pub fn bpm(&self) -> Option<u32> {
        self.heart_rate.and_then(|sample| sample.bpm())
    }

    fn raw_slot(&self, stream_id: StreamId) -> &Option<Sample> {
        match stream_id {
            StreamId::ExternalHeartRate => &self.heart_rate,
            StreamId::ExternalAcceleration => &self.external_acceleration,
            StreamId::ExternalAngularVelocity => &self.external_angular_velocity,
            StreamId::InternalAcceleration => &self.internal_acceleration,
            StreamId::InternalAngularVelocity => &self.internal_angular_velocity,
        }
    }

    fn raw_slot_mut(&mut self, stream_id: StreamId) -> &mut Option<Sample> {
        match stream_id {
            StreamId::ExternalHeartRate => &mut self.heart_rate,
            StreamId::ExternalAcceleration => &mut self.external_acceleration,
            StreamId::ExternalAngularVelocity => &mut self.external_angular_velocity,
            StreamId::InternalAcceleration => &mut self.internal_acceleration,
            StreamId::InternalAngularVelocity => &mut self.internal_angular_velocity,
        }
    }

    fn angle_slot_mut(&mut self, angle: &AngleEstimate) -> &mut Option<AngleEstimate> {
        match angle.key() {
            (SourceFamily::External, Algorithm::Ewma) => &mut self.external_ewma,
            (SourceFamily::External, Algorithm::Complementary) => &mut self.external_complementary,
            (SourceFamily::Internal, Algorithm::Ewma) => &mut self.internal_ewma,
            (SourceFamily::Internal, Algorithm::Complementary) => &mut self.internal_complementary,
        }
    }

    pub(crate) fn apply(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Raw { stream_id, sample } => *self.raw_slot_mut(*stream_id) = Some(*sample),
            StreamEvent::Angle(angle) => *self.angle_slot_mut(angle) = Some(*angle),
        }
    }
}

/// Fan-in of everything the coordinator produces into one observable snapshot.
///
/// Backed by a `watch` channel: every update swaps the whole state, so readers never
/// see a half-applied merge, and subscribers are woken on change.
pub struct Aggregator {
    sender: watch::Sender<AggregateState>,
}

impl Aggregator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(AggregateState::default());
        Self { sender }
    }

    pub fn snapshot(&self) -> AggregateState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.sender.subscribe()
    }

    pub fn apply(&self, event: &StreamEvent) {
        self.sender.send_modify(|state| state.apply(event));
    }

    pub fn set_connected(&self, connected: bool) {
        self.sender.send_if_modified(|state| {
            let changed = state.connected != connected;
            state.connected = connected;
            changed
        });
    }

    pub(crate) fn set_running(&self, stream_id: StreamId, running: bool) {
        self.sender.send_if_modified(|state| {
            let changed = if running {
                state.running.insert(stream_id)
            } else {
                state.running.remove(&stream_id)
            };
            state.measuring = !state.running.is_empty();
            changed
        });
    }

    pub fn is_running(&self, stream_id: StreamId) -> bool {
        self.sender.borrow().running.contains(&stream_id)
    }

    pub fn running_streams(&self) -> Vec<StreamId> {
        self.sender.borrow().running.iter().copied().collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for Aggregator {
    fn on_event(&self, event: &StreamEvent) {
        self.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Payload;

    fn raw(stream_id: StreamId, timestamp: i64, payload: Payload) -> StreamEvent {
        StreamEvent::Raw {
            stream_id,
            sample: Sample::new(timestamp, payload),
        }
    }

    #[test]
    fn test_fields_merge_independently() {
        let aggregator = Aggregator::new();
        aggregator.apply(&raw(StreamId::ExternalHeartRate, 5, Payload::HeartRate(70)));
        aggregator.apply(&StreamEvent::Angle(AngleEstimate::new(
            SourceFamily::Internal,
            Algorithm::Ewma,
            12.0,
            6,
        )));
        aggregator.apply(&raw(StreamId::ExternalHeartRate, 7, Payload::HeartRate(71)));

        let state = aggregator.snapshot();
        assert_eq!(state.bpm(), Some(71));
        assert_eq!(
            state
                .angle(SourceFamily::Internal, Algorithm::Ewma)
                .map(|a| a.value_degrees),
            Some(12.0)
        );
        assert!(state
            .angle(SourceFamily::External, Algorithm::Ewma)
            .is_none());
    }

    #[test]
    fn test_acceleration_slots_are_distinct() {
        let aggregator = Aggregator::new();
        aggregator.apply(&raw(
            StreamId::ExternalAcceleration,
            1,
            Payload::orientation(1.0, 0.0, 0.0),
        ));
        aggregator.apply(&raw(
            StreamId::InternalAcceleration,
            2,
            Payload::orientation(0.0, 1.0, 0.0),
        ));

        let state = aggregator.snapshot();
        assert_eq!(
            state.latest(StreamId::ExternalAcceleration).map(|s| s.timestamp()),
            Some(1)
        );
        assert_eq!(
            state.latest(StreamId::InternalAcceleration).map(|s| s.timestamp()),
            Some(2)
        );
        assert!(state.latest(StreamId::InternalAngularVelocity).is_none());
    }

    #[test]
    fn test_measuring_follows_running_set() {
        let aggregator = Aggregator::new();
        aggregator.set_running(StreamId::InternalAcceleration, true);
        aggregator.set_running(StreamId::ExternalHeartRate, true);
        assert!(aggregator.snapshot().measuring);
        assert_eq!(
            aggregator.running_streams(),
            vec![StreamId::ExternalHeartRate, StreamId::InternalAcceleration]
        );

        aggregator.set_running(StreamId::InternalAcceleration, false);
        aggregator.set_running(StreamId::ExternalHeartRate, false);
        let state = aggregator.snapshot();
        assert!(!state.measuring);
        assert!(state.running.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_woken_on_change() {
        let aggregator = Aggregator::new();
        let mut receiver = aggregator.subscribe();

        aggregator.set_connected(true);
        receiver.changed().await.unwrap();
        assert!(receiver.borrow_and_update().connected);

        // Same value again: nothing to observe.
        aggregator.set_connected(true);
        assert!(!receiver.has_changed().unwrap());
    }
}
