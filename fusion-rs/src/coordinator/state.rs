use log::{debug, warn};
use std::collections::HashMap;
use uuid::Uuid;

use common::{
    Algorithm, AngleEstimate, Payload, Sample, SourceFamily, StreamEvent, StreamId, StreamKind,
    SubscriptionHandle, XYZ,
};
use elevation_rs::{ComplementaryElevation, EwmaElevation};

use crate::config::{FilterConfig, FusionConfig};
use crate::errors::FusionError;

/// Run state of one stream. A stream without a mark is stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum RunMark {
    /// `start` is waiting for the source to accept the subscription.
    Pending { token: Uuid },
    Running {
        token: Uuid,
        handle: SubscriptionHandle,
    },
}

impl RunMark {
    pub(crate) fn token(&self) -> Uuid {
        match self {
            RunMark::Pending { token } | RunMark::Running { token, .. } => *token,
        }
    }

    pub(crate) fn handle(&self) -> Option<SubscriptionHandle> {
        match self {
            RunMark::Pending { .. } => None,
            RunMark::Running { handle, .. } => Some(*handle),
        }
    }
}

/// Filter state of one source family.
pub(crate) struct FamilyFilters {
    ewma: EwmaElevation,
    complementary: ComplementaryElevation,
    latest_gyro: Option<XYZ>,
}

impl FamilyFilters {
    fn new(config: &FilterConfig) -> Result<Self, FusionError> {
        let (ewma, complementary) = config.build()?;
        Ok(Self {
            ewma,
            complementary,
            latest_gyro: None,
        })
    }

    /// Two estimates per acceleration sample. Missing angular velocity counts as zero.
    fn estimate(
        &mut self,
        family: SourceFamily,
        accel: &XYZ,
        timestamp: i64,
    ) -> [AngleEstimate; 2] {
        let gyro = self.latest_gyro.unwrap_or_else(XYZ::zeros);
        [
            AngleEstimate::new(family, Algorithm::Ewma, self.ewma.update_xyz(accel), timestamp),
            AngleEstimate::new(
                family,
                Algorithm::Complementary,
                self.complementary.compute(accel, &gyro),
                timestamp,
            ),
        ]
    }
}

/// Everything the coordinator mutates. Guarded by a single mutex so sample delivery and
/// start/stop bookkeeping never interleave.
pub(crate) struct CoordinatorCore {
    marks: HashMap<StreamId, RunMark>,
    external: FamilyFilters,
    internal: FamilyFilters,
}

impl CoordinatorCore {
    pub(crate) fn new(config: &FusionConfig) -> Result<Self, FusionError> {
        Ok(Self {
            marks: HashMap::new(),
            external: FamilyFilters::new(&config.external)?,
            internal: FamilyFilters::new(&config.internal)?,
        })
    }

    /// Reserves `stream_id` for a new subscription and resets the state it feeds.
    pub(crate) fn mark_pending(&mut self, stream_id: StreamId) -> Result<Uuid, FusionError> {
        if self.marks.contains_key(&stream_id) {
            return Err(FusionError::AlreadyRunning(stream_id));
        }
        let filters = self.filters_mut(stream_id.family());
        match stream_id.kind() {
            StreamKind::Acceleration => filters.ewma.reset(),
            StreamKind::AngularVelocity => filters.latest_gyro = None,
            StreamKind::HeartRate => {}
        }
        let token = Uuid::new_v4();
        self.marks.insert(stream_id, RunMark::Pending { token });
        Ok(token)
    }

    /// Turns the pending mark of `token` into a running one. False if the stream was
    /// stopped (or restarted) while the subscription was in flight.
    pub(crate) fn promote(
        &mut self,
        stream_id: StreamId,
        token: Uuid,
        handle: SubscriptionHandle,
    ) -> bool {
        match self.marks.get_mut(&stream_id) {
            Some(mark) if *mark == RunMark::Pending { token } => {
                *mark = RunMark::Running { token, handle };
                true
            }
            _ => false,
        }
    }

    /// Drops the pending mark of a failed subscription, if it is still ours.
    /// Drops the pending mark of a failed start. Returns false if the mark was already
    /// replaced or removed.
    pub(crate) fn clear_pending(&mut self, stream_id: StreamId, token: Uuid) -> bool {
        let cleared = self.marks.get(&stream_id) == Some(&RunMark::Pending { token });
        if cleared {
            self.marks.remove(&stream_id);
        }
        cleared
    }

    pub(crate) fn remove(&mut self, stream_id: StreamId) -> Option<RunMark> {
        self.marks.remove(&stream_id)
    }

    pub(crate) fn marked_streams(&self) -> Vec<StreamId> {
        let mut streams: Vec<StreamId> = self.marks.keys().copied().collect();
        streams.sort();
        streams
    }

    pub(crate) fn is_current(&self, stream_id: StreamId, token: Uuid) -> bool {
        self.marks
            .get(&stream_id)
            .is_some_and(|mark| mark.token() == token)
    }

    /// Turns one delivered sample into the events it produces, in publication order:
    /// the raw sample first, then any angle estimates.
    pub(crate) fn ingest(
        &mut self,
        stream_id: StreamId,
        payload: Payload,
        timestamp: i64,
    ) -> Vec<StreamEvent> {
        if !payload.matches(stream_id) {
            warn!("Dropping {:?} delivered on {}", payload, stream_id);
            return Vec::new();
        }

        let mut events = vec![StreamEvent::Raw {
            stream_id,
            sample: Sample::new(timestamp, payload),
        }];
        let family = stream_id.family();
        let filters = self.filters_mut(family);
        match (stream_id.kind(), payload.as_xyz()) {
            (StreamKind::Acceleration, Some(accel)) => {
                events.extend(
                    filters
                        .estimate(family, &accel, timestamp)
                        .map(StreamEvent::Angle),
                );
            }
            (StreamKind::AngularVelocity, Some(gyro)) => filters.latest_gyro = Some(gyro),
            _ => {}
        }
        debug!("{} sample at {} ms: {} events", stream_id, timestamp, events.len());
        events
    }

    fn filters_mut(&mut self, family: SourceFamily) -> &mut FamilyFilters {
        match family {
            SourceFamily::External => &mut self.external,
            SourceFamily::Internal => &mut self.internal,
        }
    }
}
