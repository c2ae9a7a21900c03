use super::wait_or_shutdown;
use crate::operations::{
    RebroadcastOperation, RebroadcastOperationOutcome, SendProofOperation,
    SendProofOperationOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatIntervals {
    pub rebroadcast: Duration,
    pub proof: Duration,
    /// Wait used instead of `proof` while the local chain is empty.
    pub proof_empty_backoff: Duration,
}

impl Default for HeartbeatIntervals {
    fn default() -> Self {
        Self {
            rebroadcast: Duration::from_secs(30),
            proof: Duration::from_secs(30),
            proof_empty_backoff: Duration::from_secs(20),
        }
    }
}

/// Keeps this node listed with the relay and emits periodic proofs.
pub struct HeartbeatEngine {
    rebroadcast: Arc<RebroadcastOperation>,
    send_proof: Arc<SendProofOperation>,
    intervals: HeartbeatIntervals,
}

impl HeartbeatEngine {
    pub fn new(
        rebroadcast: Arc<RebroadcastOperation>,
        send_proof: Arc<SendProofOperation>,
        intervals: HeartbeatIntervals,
    ) -> Self {
        Self {
            rebroadcast,
            send_proof,
            intervals,
        }
    }

    #[must_use]
    pub fn spawn_rebroadcast(&self, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let operation = self.rebroadcast.clone();
        let interval = self.intervals.rebroadcast;

        tokio::spawn(async move {
            loop {
                match operation.run().await {
                    Ok(RebroadcastOperationOutcome::Present) => {}
                    Ok(RebroadcastOperationOutcome::Reregistered(record)) => {
                        tracing::info!("Re-registered node {}", record.id);
                    }
                    Err(error) => tracing::warn!("Active node check skipped: {}", error),
                }
                if wait_or_shutdown(&mut shutdown_rx, interval).await {
                    tracing::info!("rebroadcast loop shutting down");
                    break;
                }
            }
        })
    }

    #[must_use]
    pub fn spawn_proof(&self, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let operation = self.send_proof.clone();
        let intervals = self.intervals;

        tokio::spawn(async move {
            loop {
                let delay = match operation.run().await {
                    Ok(SendProofOperationOutcome::EmptyChain) => {
                        tracing::debug!("Chain empty, delaying proof");
                        intervals.proof_empty_backoff
                    }
                    Ok(SendProofOperationOutcome::Sent(_)) => intervals.proof,
                    Err(error) => {
                        tracing::warn!("Proof step failed: {}", error);
                        intervals.proof
                    }
                };
                if wait_or_shutdown(&mut shutdown_rx, delay).await {
                    tracing::info!("proof loop shutting down");
                    break;
                }
            }
        })
    }
}
