use super::{ActiveNodes, Balance, NodeProof, Relay};
use crate::block::Chain;
use crate::error::{OrbitError, Result};
use crate::node::NodeRecord;
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory relay double. `None` fields make the matching call fail as if
/// the relay were unreachable.
#[derive(Default)]
pub(crate) struct MockRelay {
    pub(crate) chain: Mutex<Option<Chain>>,
    pub(crate) active: Mutex<Option<ActiveNodes>>,
    pub(crate) balance: Mutex<Option<Balance>>,
    pub(crate) address: Mutex<Option<String>>,
    pub(crate) fail_publish: Mutex<bool>,
    pub(crate) pings: Mutex<Vec<NodeRecord>>,
    pub(crate) proofs: Mutex<Vec<NodeProof>>,
    pub(crate) balance_lookups: Mutex<Vec<String>>,
}

impl MockRelay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_chain(&self, chain: Option<Chain>) {
        *self.chain.lock().unwrap() = chain;
    }

    pub(crate) fn set_active(&self, active: Option<ActiveNodes>) {
        *self.active.lock().unwrap() = active;
    }

    pub(crate) fn set_balance(&self, balance: Option<Balance>) {
        *self.balance.lock().unwrap() = balance;
    }

    pub(crate) fn set_address(&self, address: Option<String>) {
        *self.address.lock().unwrap() = address;
    }

    pub(crate) fn set_fail_publish(&self, fail: bool) {
        *self.fail_publish.lock().unwrap() = fail;
    }

    pub(crate) fn pings(&self) -> Vec<NodeRecord> {
        self.pings.lock().unwrap().clone()
    }

    pub(crate) fn proofs(&self) -> Vec<NodeProof> {
        self.proofs.lock().unwrap().clone()
    }

    fn unreachable(what: &str) -> OrbitError {
        OrbitError::Http(format!("{} failed: relay unreachable", what))
    }
}

#[async_trait]
impl Relay for MockRelay {
    async fn fetch_chain(&self) -> Result<Chain> {
        self.chain
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unreachable("chain fetch"))
    }

    async fn ping(&self, record: &NodeRecord) -> Result<()> {
        if *self.fail_publish.lock().unwrap() {
            return Err(Self::unreachable("node ping"));
        }
        self.pings.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn active_nodes(&self) -> Result<ActiveNodes> {
        self.active
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unreachable("active nodes query"))
    }

    async fn balance(&self, address: &str) -> Result<Balance> {
        self.balance_lookups.lock().unwrap().push(address.to_string());
        self.balance
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::unreachable("balance lookup"))
    }

    async fn assign_address(&self, _uid: &str) -> Result<String> {
        self.address
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| OrbitError::Relay("address assignment refused: status=error".into()))
    }

    async fn submit_proof(&self, proof: &NodeProof) -> Result<()> {
        if *self.fail_publish.lock().unwrap() {
            return Err(Self::unreachable("proof submission"));
        }
        self.proofs.lock().unwrap().push(proof.clone());
        Ok(())
    }
}
