use super::wait_or_shutdown;
use crate::operations::SyncChainOperation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Periodically reconciles the local chain against the relay.
pub struct SyncEngine {
    operation: Arc<SyncChainOperation>,
    interval: Duration,
}

impl SyncEngine {
    pub fn new(operation: Arc<SyncChainOperation>, interval: Duration) -> Self {
        Self {
            operation,
            interval,
        }
    }

    #[must_use]
    pub fn spawn(&self, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let operation = self.operation.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            loop {
                if let Err(error) = operation.run().await {
                    tracing::warn!("Chain sync skipped: {}", error);
                }
                if wait_or_shutdown(&mut shutdown_rx, interval).await {
                    tracing::info!("sync engine shutting down");
                    break;
                }
            }
        })
    }
}
