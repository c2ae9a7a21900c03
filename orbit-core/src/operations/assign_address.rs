use crate::node::NodeIdentity;
use crate::relay::Relay;
use crate::Result;
use std::sync::Arc;

/// Obtains this node's ledger address from the relay and records it on the
/// identity. Failure here is fatal for startup.
#[derive(Clone)]
pub struct AssignAddressOperation {
    relay: Arc<dyn Relay>,
}

impl AssignAddressOperation {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    pub async fn run(&self, identity: &NodeIdentity) -> Result<String> {
        let uid = identity.uid();
        let address = self.relay.assign_address(&uid).await?;
        identity.set_address(address.clone());
        tracing::info!("Assigned ledger address {} to {}", address, identity.node_id());
        Ok(address)
    }
}
