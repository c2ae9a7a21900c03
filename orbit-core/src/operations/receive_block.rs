use crate::block::Block;
use crate::storage::{AppendOutcome, ChainStore};
use crate::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ReceiveBlockOperationRequest {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveBlockOperationOutcome {
    Accepted { index: u64, chain_len: usize },
    Rejected,
}

/// Validates a block pushed by a peer and appends it on success.
#[derive(Clone)]
pub struct ReceiveBlockOperation {
    chain_store: Arc<ChainStore>,
}

impl ReceiveBlockOperation {
    pub fn new(chain_store: Arc<ChainStore>) -> Self {
        Self { chain_store }
    }

    pub async fn run(
        &self,
        request: ReceiveBlockOperationRequest,
    ) -> Result<ReceiveBlockOperationOutcome> {
        let ReceiveBlockOperationRequest { block } = request;
        let candidate_index = block.index;

        match self.chain_store.append(block).await? {
            AppendOutcome::Accepted { index, chain_len } => {
                tracing::info!("Block {} accepted, chain length {}", index, chain_len);
                Ok(ReceiveBlockOperationOutcome::Accepted { index, chain_len })
            }
            AppendOutcome::Rejected => {
                tracing::info!("Block {} rejected: linkage mismatch", candidate_index);
                Ok(ReceiveBlockOperationOutcome::Rejected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receive_block_flow() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ChainStore::open(dir.path(), "Node0500").await.unwrap());
        let operation = ReceiveBlockOperation::new(store.clone());

        let outcome = operation
            .run(ReceiveBlockOperationRequest {
                block: Block::new(0, "h0", None),
            })
            .await
            .unwrap();
        assert_eq!(outcome, ReceiveBlockOperationOutcome::Rejected);

        store.replace(vec![Block::new(0, "h0", None)]).await.unwrap();

        let outcome = operation
            .run(ReceiveBlockOperationRequest {
                block: Block::new(1, "h1", Some("h0".to_string())),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReceiveBlockOperationOutcome::Accepted {
                index: 1,
                chain_len: 2
            }
        );
        assert_eq!(store.valid_count(), 1);

        let outcome = operation
            .run(ReceiveBlockOperationRequest {
                block: Block::new(2, "h2", Some("WRONG".to_string())),
            })
            .await
            .unwrap();
        assert_eq!(outcome, ReceiveBlockOperationOutcome::Rejected);
        assert_eq!(store.len().await, 2);
    }
}
