use std::collections::HashMap;
use uuid::Uuid;

use common::{Algorithm, Payload, SourceFamily, StreamEvent, StreamId};

/// Why a recording ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeReason {
    Explicit,
    Elapsed,
}

/// Time-ordered samples captured between `begin` and finalize.
///
/// Raw samples are kept per stream, angle estimates per (family, algorithm). Each series
/// only grows forward in time.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSession {
    id: Uuid,
    started_at: i64,
    duration_ms: i64,
    finished_at: Option<i64>,
    reason: Option<FinalizeReason>,
    streams: HashMap<StreamId, Vec<(i64, Payload)>>,
    angles: HashMap<(SourceFamily, Algorithm), Vec<(i64, f32)>>,
}

impl RecordingSession {
    pub(crate) fn new(started_at: i64, duration_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            duration_ms,
            finished_at: None,
            reason: None,
            streams: HashMap::new(),
            angles: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn finished_at(&self) -> Option<i64> {
        self.finished_at
    }

    pub fn reason(&self) -> Option<FinalizeReason> {
        self.reason
    }

    pub fn is_due(&self, now: i64) -> bool {
        now - self.started_at >= self.duration_ms
    }

    /// Raw series of `stream_id`; empty when nothing was captured.
    pub fn stream(&self, stream_id: StreamId) -> &[(i64, Payload)] {
        self.streams
            .get(&stream_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn angles(&self, family: SourceFamily, algorithm: Algorithm) -> &[(i64, f32)] {
        self.angles
            .get(&(family, algorithm))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Streams with at least one entry, in `StreamId` order.
    pub fn recorded_streams(&self) -> Vec<StreamId> {
        let mut streams: Vec<StreamId> = self
            .streams
            .iter()
            .filter(|(_, series)| !series.is_empty())
            .map(|(stream_id, _)| *stream_id)
            .collect();
        streams.sort();
        streams
    }

    pub fn recorded_angles(&self) -> Vec<(SourceFamily, Algorithm)> {
        let mut keys: Vec<(SourceFamily, Algorithm)> = self
            .angles
            .iter()
            .filter(|(_, series)| !series.is_empty())
            .map(|(key, _)| *key)
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.streams.values().map(Vec::len).sum::<usize>()
            + self.angles.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `event` to its series. Events older than the series tail are refused.
    pub(crate) fn append(&mut self, event: &StreamEvent) -> bool {
        let timestamp = event.timestamp();
        match event {
            StreamEvent::Raw { stream_id, sample } => {
                push_monotonic(self.streams.entry(*stream_id).or_default(), timestamp, sample.payload())
            }
            StreamEvent::Angle(angle) => push_monotonic(
                self.angles.entry(angle.key()).or_default(),
                timestamp,
                angle.value_degrees,
            ),
        }
    }

    pub(crate) fn close(&mut self, finished_at: i64, reason: FinalizeReason) {
        self.finished_at = Some(finished_at);
        self.reason = Some(reason);
    }
}

fn push_monotonic<T>(series: &mut Vec<(i64, T)>, timestamp: i64, value: T) -> bool {
    if let Some((last, _)) = series.last() {
        if timestamp < *last {
            log::warn!(
                "Dropping out-of-order sample at {} ms (series tail at {} ms)",
                timestamp,
                last
            );
            return false;
        }
    }
    series.push((timestamp, value));
    true
}
