use std::sync::Arc;

use common::{Clock, SourceFamily};

use crate::adapters::simulated::{SimulatedSource, SimulationConfig};
use crate::errors::SimulationError;

/// Starts a simulated source in a background task.
///
/// Samples are timestamped with `clock`; pass the consumer's clock so recordings line up.
/// The loop runs for `run_for_millis`, or until Ctrl+C / [`SimulatedSource::stop`] when
/// `None`.
///
/// # Returns
///
/// Returns a tuple containing:
/// * A `tokio::task::JoinHandle<()>` representing the spawned generator loop.
/// * An `Arc<SimulatedSource>` to subscribe to and control the generator.
pub fn run_simulated_source(
    family: SourceFamily,
    config: SimulationConfig,
    clock: Clock,
    run_for_millis: Option<u64>,
) -> Result<(tokio::task::JoinHandle<()>, Arc<SimulatedSource>), SimulationError> {
    let source = Arc::new(SimulatedSource::with_clock(family, config, clock)?);

    let handle = tokio::spawn({
        let source = source.clone();
        async move {
            source.start(run_for_millis).await;
        }
    });
    Ok((handle, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_simulated_source() {
        let (handle, source) = run_simulated_source(
            SourceFamily::Internal,
            SimulationConfig::default(),
            Clock::new(),
            Some(100),
        )
        .unwrap();

        handle.await.unwrap();
        assert!(!source.is_connected());
    }

    #[tokio::test]
    async fn test_run_with_invalid_config() {
        let config = SimulationConfig {
            period_millis: 0,
            ..Default::default()
        };
        let result = run_simulated_source(SourceFamily::External, config, Clock::new(), Some(10));
        assert_eq!(result.err(), Some(SimulationError::InvalidPeriod));
    }
}
