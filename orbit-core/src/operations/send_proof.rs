use crate::relay::{NodeProof, Relay};
use crate::storage::ChainStore;
use crate::validator::PROOF_WINDOW;
use crate::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum SendProofOperationOutcome {
    EmptyChain,
    Sent(NodeProof),
}

/// Publishes the tail digest of the local chain as a liveness proof.
/// Submission is fire-and-forget: failures are logged, not returned.
#[derive(Clone)]
pub struct SendProofOperation {
    node_id: String,
    chain_store: Arc<ChainStore>,
    relay: Arc<dyn Relay>,
}

impl SendProofOperation {
    pub fn new(
        node_id: impl Into<String>,
        chain_store: Arc<ChainStore>,
        relay: Arc<dyn Relay>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            chain_store,
            relay,
        }
    }

    pub async fn run(&self) -> Result<SendProofOperationOutcome> {
        let Some((latest_hash, proof_hash)) = self.chain_store.proof_material(PROOF_WINDOW).await
        else {
            return Ok(SendProofOperationOutcome::EmptyChain);
        };

        let proof = NodeProof {
            node_id: self.node_id.clone(),
            latest_hash,
            proof_hash,
        };

        match self.relay.submit_proof(&proof).await {
            Ok(()) => tracing::debug!("Proof {} sent for {}", proof.proof_hash, proof.node_id),
            Err(error) => tracing::warn!("Proof submission for {} failed: {}", proof.node_id, error),
        }

        Ok(SendProofOperationOutcome::Sent(proof))
    }
}
