use crate::block::first_linkage_violation;
use crate::relay::Relay;
use crate::storage::{ChainStore, ReplaceOutcome};
use crate::Result;
use std::sync::Arc;

pub type SyncChainOperationOutcome = ReplaceOutcome;

/// Pulls the relay's chain and adopts it when it is strictly longer than the
/// local one. Length is the only signal; the adopted chain is not
/// re-validated.
#[derive(Clone)]
pub struct SyncChainOperation {
    chain_store: Arc<ChainStore>,
    relay: Arc<dyn Relay>,
}

impl SyncChainOperation {
    pub fn new(chain_store: Arc<ChainStore>, relay: Arc<dyn Relay>) -> Self {
        Self { chain_store, relay }
    }

    pub async fn run(&self) -> Result<SyncChainOperationOutcome> {
        let remote = self.relay.fetch_chain().await?;
        let violation = first_linkage_violation(&remote);

        let outcome = self.chain_store.replace_if_longer(remote).await?;
        match &outcome {
            ReplaceOutcome::Replaced {
                previous_len,
                new_len,
            } => {
                tracing::info!(
                    "Chain updated from relay: {} -> {} blocks",
                    previous_len,
                    new_len
                );
                if let Some(index) = violation {
                    tracing::warn!(
                        "Adopted relay chain has a linkage break at index {}",
                        index
                    );
                }
            }
            ReplaceOutcome::Unchanged {
                local_len,
                remote_len,
            } => {
                tracing::debug!(
                    "Relay chain not longer than local ({} <= {}), keeping local",
                    remote_len,
                    local_len
                );
            }
        }

        Ok(outcome)
    }
}
