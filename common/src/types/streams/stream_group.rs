use crate::types::streams::{SourceFamily, StreamId};

/// Set of streams started and stopped as one unit.
///
/// The IMU groups mirror how a wearable's "combined" streaming and the host's motion
/// sensors are driven: acceleration and angular velocity together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamGroup {
    Single(StreamId),
    ExternalImu,
    InternalImu,
}

impl StreamGroup {
    pub fn imu(family: SourceFamily) -> Self {
        match family {
            SourceFamily::External => StreamGroup::ExternalImu,
            SourceFamily::Internal => StreamGroup::InternalImu,
        }
    }

    pub fn streams(&self) -> Vec<StreamId> {
        match self {
            StreamGroup::Single(stream_id) => vec![*stream_id],
            StreamGroup::ExternalImu => vec![
                StreamId::ExternalAcceleration,
                StreamId::ExternalAngularVelocity,
            ],
            StreamGroup::InternalImu => vec![
                StreamId::InternalAcceleration,
                StreamId::InternalAngularVelocity,
            ],
        }
    }
}

impl From<StreamId> for StreamGroup {
    fn from(value: StreamId) -> Self {
        StreamGroup::Single(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imu_groups_stay_in_family() {
        for family in SourceFamily::ALL {
            let streams = StreamGroup::imu(family).streams();
            assert_eq!(streams.len(), 2);
            assert!(streams.iter().all(|s| s.family() == family));
            assert!(streams.contains(&family.acceleration()));
            assert!(streams.contains(&family.angular_velocity()));
        }
    }

    #[test]
    fn test_single() {
        let group = StreamGroup::from(StreamId::ExternalHeartRate);
        assert_eq!(group.streams(), vec![StreamId::ExternalHeartRate]);
    }
}
