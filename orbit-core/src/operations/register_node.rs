use crate::node::{NodeIdentity, NodeRecord};
use crate::relay::Relay;
use crate::storage::NodeRegistry;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;

/// Builds this node's registry record, stores it locally and announces it to
/// the relay. The announcement is best effort: a failed ping is logged and
/// the record is still returned.
#[derive(Clone)]
pub struct RegisterNodeOperation {
    identity: Arc<NodeIdentity>,
    registry: Arc<NodeRegistry>,
    relay: Arc<dyn Relay>,
    fee_address: String,
}

impl RegisterNodeOperation {
    pub fn new(
        identity: Arc<NodeIdentity>,
        registry: Arc<NodeRegistry>,
        relay: Arc<dyn Relay>,
        fee_address: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            registry,
            relay,
            fee_address: fee_address.into(),
        }
    }

    pub async fn run(&self) -> Result<NodeRecord> {
        let nodefeebalance = match self.relay.balance(&self.fee_address).await {
            Ok(balance) => balance.total_balance,
            Err(error) => {
                tracing::warn!(
                    "Fee balance lookup for {} failed, reporting 0: {}",
                    self.fee_address,
                    error
                );
                0.0
            }
        };

        let record = NodeRecord {
            id: self.identity.node_id().to_string(),
            address: self.identity.address(),
            user: self.identity.user().to_string(),
            host: self.identity.host().to_string(),
            port: self.identity.port(),
            uptime: 1.0,
            trust: 1.0,
            last_seen: Utc::now().timestamp(),
            nodefeebalance,
        };

        self.registry.upsert(record.clone()).await?;

        match self.relay.ping(&record).await {
            Ok(()) => tracing::info!("Registered node {} with relay", record.id),
            Err(error) => tracing::warn!("Node ping for {} failed: {}", record.id, error),
        }

        Ok(record)
    }
}
