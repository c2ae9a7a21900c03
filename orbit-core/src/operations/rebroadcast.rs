use super::RegisterNodeOperation;
use crate::node::NodeRecord;
use crate::relay::Relay;
use crate::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum RebroadcastOperationOutcome {
    Present,
    Reregistered(NodeRecord),
}

/// Re-announces this node when the relay no longer lists it as active.
#[derive(Clone)]
pub struct RebroadcastOperation {
    node_id: String,
    relay: Arc<dyn Relay>,
    register: Arc<RegisterNodeOperation>,
}

impl RebroadcastOperation {
    pub fn new(
        node_id: impl Into<String>,
        relay: Arc<dyn Relay>,
        register: Arc<RegisterNodeOperation>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            relay,
            register,
        }
    }

    pub async fn run(&self) -> Result<RebroadcastOperationOutcome> {
        let active = self.relay.active_nodes().await?;
        if active.contains_key(&self.node_id) {
            return Ok(RebroadcastOperationOutcome::Present);
        }

        tracing::info!(
            "Node {} missing from relay active set, re-registering",
            self.node_id
        );
        let record = self.register.run().await?;
        Ok(RebroadcastOperationOutcome::Reregistered(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeIdentity;
    use crate::relay::ActiveNodes;
    use crate::relay::testing::MockRelay;
    use crate::storage::NodeRegistry;
    use crate::OrbitError;
    use serde_json::json;

    async fn setup() -> (tempfile::TempDir, Arc<MockRelay>, RebroadcastOperation) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(NodeRegistry::open(dir.path()).await.unwrap());
        let relay = Arc::new(MockRelay::new());
        let identity = Arc::new(NodeIdentity::new("Node0300", "ORB.OPERATOR", 5300, None));
        let register = Arc::new(RegisterNodeOperation::new(
            identity,
            registry,
            relay.clone(),
            "ORB.FEES",
        ));
        let operation = RebroadcastOperation::new("Node0300", relay.clone(), register);
        (dir, relay, operation)
    }

    #[tokio::test]
    async fn test_present_node_is_left_alone() {
        let (_dir, relay, operation) = setup().await;
        let mut active = ActiveNodes::new();
        active.insert("Node0300".to_string(), json!({"last_seen": 1.0}));
        relay.set_active(Some(active));

        assert_eq!(
            operation.run().await.unwrap(),
            RebroadcastOperationOutcome::Present
        );
        assert!(relay.pings().is_empty());
    }

    #[tokio::test]
    async fn test_missing_node_reregisters() {
        let (_dir, relay, operation) = setup().await;
        let mut active = ActiveNodes::new();
        active.insert("Node9999".to_string(), json!({}));
        relay.set_active(Some(active));

        let outcome = operation.run().await.unwrap();
        let RebroadcastOperationOutcome::Reregistered(record) = outcome else {
            panic!("expected re-registration, got {:?}", outcome);
        };
        assert_eq!(record.id, "Node0300");
        assert_eq!(relay.pings().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_reported() {
        let (_dir, relay, operation) = setup().await;
        assert!(matches!(operation.run().await, Err(OrbitError::Http(_))));
        assert!(relay.pings().is_empty());
    }
}
