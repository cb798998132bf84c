mod gaussian;
mod motion;

use async_trait::async_trait;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

use common::{
    Clock, ConnectionCallback, Payload, SampleCallback, SampleSource, SourceError, SourceFamily,
    StreamId, SubscriptionHandle, XYZ,
};

use crate::errors::SimulationError;
use crate::models::connection::Connection;
use crate::models::shutdown;
use crate::models::subscriptions::Subscriptions;
use gaussian::GaussianNoise;
use motion::TiltMotion;

/// Parameters of the generated motion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub period_millis: u64,
    pub elevation_degrees: f32,
    pub angular_velocity: [f32; 3],
    pub heart_rate_bpm: u32,
    pub gravity: f32,
    /// Standard deviation of the noise added to every axis. `None` emits clean samples.
    pub noise_stdev: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period_millis: 20,
            elevation_degrees: 30.0,
            angular_velocity: [0.0, 0.01, 0.0],
            heart_rate_bpm: 72,
            gravity: 9.81,
            noise_stdev: None,
            seed: None,
        }
    }
}

/// Periodic generator emulating a device held at a fixed elevation.
///
/// Every period it emits one acceleration and one angular-velocity sample to the
/// subscribed streams of its family, plus a heart rate for the external family. The
/// source reports itself connected while its loop runs.
pub struct SimulatedSource {
    family: SourceFamily,
    config: SimulationConfig,
    clock: Clock,
    subscriptions: Subscriptions,
    motion: Mutex<TiltMotion>,
    noise: Option<GaussianNoise>,
    connection: Connection,
    abort_signal: Arc<Notify>,
}

impl SimulatedSource {
    pub fn new(family: SourceFamily, config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_clock(family, config, Clock::new())
    }

    /// Timestamps samples with `clock`, so they share an epoch with the consumer.
    pub fn with_clock(
        family: SourceFamily,
        config: SimulationConfig,
        clock: Clock,
    ) -> Result<Self, SimulationError> {
        if config.period_millis == 0 {
            return Err(SimulationError::InvalidPeriod);
        }
        let noise = config
            .noise_stdev
            .map(|stdev| GaussianNoise::new(0.0, stdev))
            .transpose()?;

        Ok(Self {
            family,
            motion: Mutex::new(TiltMotion::new(config.gravity, config.elevation_degrees)),
            config,
            clock,
            subscriptions: Subscriptions::new(),
            noise,
            connection: Connection::new(false),
            abort_signal: Arc::new(Notify::new()),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_elevation(&self, elevation_degrees: f32) {
        self.motion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_elevation(elevation_degrees);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connection.set(connected);
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Runs the generator until [`SimulatedSource::stop`] is called, `run_for_millis`
    /// elapses, or Ctrl+C is received when no lifetime is given.
    pub async fn start(&self, run_for_millis: Option<u64>) {
        let shutdown = shutdown::listen_for_shutdown(self.abort_signal.clone(), run_for_millis);
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.period_millis));

        info!("Simulated {} source started", self.family);
        self.connection.set(true);
        loop {
            tokio::select! {
                _ = self.abort_signal.notified() => break,
                _ = interval.tick() => self.emit_tick(&mut rng),
            }
        }
        // A leftover timer or Ctrl+C listener would end the next run.
        shutdown.abort();
        self.connection.set(false);
        info!("Simulated {} source stopped", self.family);
    }

    pub fn stop(&self) {
        self.abort_signal.notify_one();
    }

    fn emit_tick(&self, rng: &mut StdRng) {
        let timestamp = self.clock.now_ms();
        let acceleration = self
            .motion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .acceleration();
        let angular_velocity = XYZ::new(self.config.angular_velocity);
        let mut heart_rate = self.config.heart_rate_bpm;

        let (acceleration, angular_velocity) = match &self.noise {
            Some(noise) => {
                heart_rate = noise.add_noise_bpm(rng, heart_rate);
                (
                    noise.add_noise_xyz(rng, acceleration),
                    noise.add_noise_xyz(rng, angular_velocity),
                )
            }
            None => (acceleration, angular_velocity),
        };

        self.subscriptions.deliver(
            self.family.acceleration(),
            Payload::Orientation(acceleration),
            timestamp,
        );
        self.subscriptions.deliver(
            self.family.angular_velocity(),
            Payload::Orientation(angular_velocity),
            timestamp,
        );
        if self.family == SourceFamily::External {
            self.subscriptions.deliver(
                StreamId::ExternalHeartRate,
                Payload::HeartRate(heart_rate),
                timestamp,
            );
        }
    }
}

#[async_trait]
impl SampleSource for SimulatedSource {
    fn family(&self) -> SourceFamily {
        self.family
    }

    async fn subscribe(
        &self,
        stream_id: StreamId,
        callback: SampleCallback,
    ) -> Result<SubscriptionHandle, SourceError> {
        if stream_id.family() != self.family {
            return Err(SourceError::SourceUnavailable(stream_id));
        }
        Ok(self.subscriptions.insert(stream_id, callback))
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.subscriptions.remove(&handle);
    }

    fn on_connection_change(&self, callback: ConnectionCallback) {
        self.connection.observe(callback);
    }
}
