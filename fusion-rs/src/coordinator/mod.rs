mod state;

use async_trait::async_trait;
use dashmap::DashSet;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use uuid::Uuid;

use common::{
    Notifiable, Payload, SampleCallback, SampleSource, SourceFamily, StreamEvent, StreamGroup,
    StreamId, SubscriptionHandle,
};
use publisher::{PublisherError, PublisherManager};

use crate::aggregator::Aggregator;
use crate::config::FusionConfig;
use crate::errors::FusionError;
use crate::recorder::Recorder;
use crate::traits::{EventSink, StreamControl};
use state::{CoordinatorCore, RunMark};

struct Shared {
    core: Mutex<CoordinatorCore>,
    /// Streams claimed by a `start` whose subscription has not completed yet. Kept
    /// outside the core so listeners can query it while samples are dispatched.
    starting: DashSet<StreamId>,
    sources: HashMap<SourceFamily, Arc<dyn SampleSource>>,
    aggregator: Arc<Aggregator>,
    recorder: Arc<Recorder>,
    publishers: PublisherManager<StreamEvent, StreamId>,
}

impl Shared {
    fn lock_core(&self) -> MutexGuard<'_, CoordinatorCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_sample(&self, stream_id: StreamId, token: Uuid, payload: Payload, timestamp: i64) {
        let mut core = self.lock_core();
        if !core.is_current(stream_id, token) {
            debug!("Discarding {} sample from a stale subscription", stream_id);
            return;
        }
        // Dispatch happens with the core held so every consumer sees production order.
        for event in core.ingest(stream_id, payload, timestamp) {
            self.aggregator.on_event(&event);
            self.recorder.on_event(&event);
            self.publishers
                .notify_listeners(&event.topic(), Arc::new(event));
        }
    }
}

/// Starts and stops sample streams, applies the elevation filters to what they deliver
/// and fans the results out.
///
/// At most one subscription per [`StreamId`] is ever active. Every produced
/// [`StreamEvent`] goes, in order, to the [`Aggregator`], the [`Recorder`] and the
/// listeners registered for its stream.
///
/// Listeners run inside the ingestion critical section: they may read
/// [`StreamCoordinator::is_running`] but must not await `start` or `stop` inline.
#[derive(Clone)]
pub struct StreamCoordinator {
    shared: Arc<Shared>,
}

impl StreamCoordinator {
    /// One source per family; a later source of the same family replaces an earlier one.
    /// The external source's connection flag is mirrored into the aggregator.
    pub fn new(
        sources: Vec<Arc<dyn SampleSource>>,
        config: &FusionConfig,
        aggregator: Arc<Aggregator>,
        recorder: Arc<Recorder>,
    ) -> Result<Self, FusionError> {
        let mut by_family: HashMap<SourceFamily, Arc<dyn SampleSource>> = HashMap::new();
        for source in sources {
            let family = source.family();
            if by_family.insert(family, source).is_some() {
                warn!("Replacing previously registered {} source", family);
            }
        }

        if let Some(external) = by_family.get(&SourceFamily::External) {
            let aggregator = aggregator.clone();
            external.on_connection_change(Arc::new(move |connected: bool| {
                info!("External device connected: {}", connected);
                aggregator.set_connected(connected);
            }));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                core: Mutex::new(CoordinatorCore::new(config)?),
                starting: DashSet::new(),
                sources: by_family,
                aggregator,
                recorder,
                publishers: PublisherManager::new(&StreamId::ALL),
            }),
        })
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.shared.aggregator
    }

    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.shared.recorder
    }

    /// Subscribes to `stream_id`.
    ///
    /// Returns `AlreadyRunning` without touching any state when the stream is running or
    /// being started. Source failures leave the stream stopped.
    pub async fn start(&self, stream_id: StreamId) -> Result<(), FusionError> {
        let source = self.source_for(stream_id)?;
        let token = {
            let mut core = self.shared.lock_core();
            let token = core.mark_pending(stream_id).map_err(|err| {
                warn!("Start of {} ignored: {}", stream_id, err);
                err
            })?;
            self.shared.starting.insert(stream_id);
            token
        };

        let handle = match source.subscribe(stream_id, self.sample_callback(token)).await {
            Ok(handle) => handle,
            Err(err) => {
                {
                    let mut core = self.shared.lock_core();
                    if core.clear_pending(stream_id, token) {
                        self.shared.starting.remove(&stream_id);
                    }
                }
                warn!("Could not start {}: {}", stream_id, err);
                return Err(err.into());
            }
        };

        let promoted = {
            let mut core = self.shared.lock_core();
            let promoted = core.promote(stream_id, token, handle);
            if promoted {
                self.shared.starting.remove(&stream_id);
                self.shared.aggregator.set_running(stream_id, true);
            }
            promoted
        };
        if promoted {
            info!("Stream {} started", stream_id);
        } else {
            debug!("Stream {} was stopped while subscribing", stream_id);
            source.unsubscribe(handle).await;
        }
        Ok(())
    }

    /// Unsubscribes from `stream_id`. No sample of it is processed once this returns.
    /// Stopping a stopped stream is a no-op.
    pub async fn stop(&self, stream_id: StreamId) -> Result<(), FusionError> {
        if self.stop_streams(Some(&[stream_id][..])).await.is_empty() {
            debug!("{}", FusionError::NotRunning(stream_id));
        }
        Ok(())
    }

    /// Starts every stream of `group`, undoing the ones already started if one fails.
    pub async fn start_group(&self, group: StreamGroup) -> Result<(), FusionError> {
        let mut started = Vec::new();
        for stream_id in group.streams() {
            if let Err(err) = self.start(stream_id).await {
                if !started.is_empty() {
                    warn!("Rolling back {:?} after {}", started, err);
                    self.stop_streams(Some(started.as_slice())).await;
                }
                return Err(err);
            }
            started.push(stream_id);
        }
        Ok(())
    }

    pub async fn stop_group(&self, group: StreamGroup) -> Result<(), FusionError> {
        self.stop_streams(Some(group.streams().as_slice())).await;
        Ok(())
    }

    /// Stops every running stream and returns the ones stopped.
    pub async fn stop_all(&self) -> Vec<StreamId> {
        self.stop_streams(None).await
    }

    /// True from the moment `start` claims the stream, so it agrees with the
    /// `AlreadyRunning` answer of a concurrent `start`. The aggregate snapshot only lists
    /// streams whose subscription is established.
    pub fn is_running(&self, stream_id: StreamId) -> bool {
        self.shared.starting.contains(&stream_id) || self.shared.aggregator.is_running(stream_id)
    }

    pub fn running_streams(&self) -> Vec<StreamId> {
        let mut streams = self.shared.aggregator.running_streams();
        streams.extend(self.shared.starting.iter().map(|entry| *entry));
        streams.sort();
        streams.dedup();
        streams
    }

    /// Registers `listener` for the events of `stream_id`. Angle estimates are published
    /// under the acceleration stream that produced them.
    pub fn add_listener(
        &self,
        listener: &mut dyn Notifiable<StreamEvent>,
        stream_id: StreamId,
    ) -> Result<Uuid, PublisherError> {
        self.shared.publishers.add_listener(listener, &stream_id)
    }

    pub fn remove_listener(&self, id: Uuid) -> Result<(), PublisherError> {
        self.shared.publishers.remove_listener(id)
    }

    pub fn listener_count(&self, stream_id: StreamId) -> usize {
        self.shared.publishers.listener_count(&stream_id)
    }

    /// Per-stream fan-out, for consumers that manage listeners themselves.
    pub fn publishers(&self) -> &PublisherManager<StreamEvent, StreamId> {
        &self.shared.publishers
    }

    /// Clears the run marks of `streams` (every marked stream if `None`) in one critical
    /// section, then unsubscribes.
    async fn stop_streams(&self, streams: Option<&[StreamId]>) -> Vec<StreamId> {
        let removed: Vec<(StreamId, RunMark)> = {
            let mut core = self.shared.lock_core();
            let streams = match streams {
                Some(streams) => streams.to_vec(),
                None => core.marked_streams(),
            };
            streams
                .into_iter()
                .filter_map(|stream_id| {
                    let mark = core.remove(stream_id)?;
                    self.shared.starting.remove(&stream_id);
                    self.shared.aggregator.set_running(stream_id, false);
                    Some((stream_id, mark))
                })
                .collect()
        };

        for (stream_id, mark) in &removed {
            // A pending start notices the missing mark and unsubscribes on its own.
            if let Some(handle) = mark.handle() {
                self.unsubscribe(handle).await;
            }
            info!("Stream {} stopped", stream_id);
        }
        removed.into_iter().map(|(stream_id, _)| stream_id).collect()
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) {
        match self.shared.sources.get(&handle.stream_id().family()) {
            Some(source) => source.unsubscribe(handle).await,
            None => warn!("No source left to release {}", handle),
        }
    }

    fn source_for(&self, stream_id: StreamId) -> Result<Arc<dyn SampleSource>, FusionError> {
        let family = stream_id.family();
        self.shared
            .sources
            .get(&family)
            .cloned()
            .ok_or(FusionError::NoSourceForFamily(family))
    }

    fn sample_callback(&self, token: Uuid) -> SampleCallback {
        // Weak: sources keep their callbacks, and the shared state keeps the sources.
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        Arc::new(move |stream_id: StreamId, payload: Payload, timestamp: i64| {
            if let Some(shared) = shared.upgrade() {
                shared.on_sample(stream_id, token, payload, timestamp);
            }
        })
    }
}

#[async_trait]
impl StreamControl for StreamCoordinator {
    async fn stop_all(&self) -> Vec<StreamId> {
        StreamCoordinator::stop_all(self).await
    }
}
