use log::{error, info};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;

/// Spawns a task that fires `notify` after `run_for_millis`, or on Ctrl+C when no
/// lifetime is given.
pub(crate) fn listen_for_shutdown(
    notify: Arc<Notify>,
    run_for_millis: Option<u64>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match run_for_millis {
            Some(time_to_live_millis) => {
                tokio::time::sleep(std::time::Duration::from_millis(time_to_live_millis)).await;
            }
            None => {
                if let Err(e) = signal::ctrl_c().await {
                    error!("Error while waiting for Ctrl+C: {}", e);
                    return;
                }
                info!("Ctrl+C received. Sending stop signal...");
            }
        }
        notify.notify_one();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_shutdown_signal_with_timeout() {
        let notify = Arc::new(Notify::new());
        let handle = listen_for_shutdown(notify.clone(), Some(200));

        let result = timeout(Duration::from_millis(300), notify.notified()).await;
        assert!(result.is_ok(), "Shutdown signal was not received in time");

        handle.await.unwrap();
    }
}
