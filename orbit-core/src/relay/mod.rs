//! Relay module: the single trusted explorer service this node replicates
//! from and reports to.
//!
//! Operations depend on the [`Relay`] trait so the HTTP transport can be
//! swapped for an in-memory double in tests.

pub mod factory;
pub mod http;
#[cfg(test)]
pub(crate) mod testing;

use crate::block::Chain;
use crate::error::Result;
use crate::node::NodeRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use factory::RelayBuilder;
pub use http::HttpRelay;

/// Fee balance as reported by `GET /api/balance/<address>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub total_balance: f64,
    pub available_balance: f64,
    pub locked_balance: f64,
}

/// Rolling-digest liveness proof published to `POST /node_proof`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProof {
    pub node_id: String,
    pub latest_hash: String,
    pub proof_hash: String,
}

/// Active set as returned by `GET /active_nodes`, keyed by node id. Values
/// are relay-defined and only the keys are inspected.
pub type ActiveNodes = HashMap<String, serde_json::Value>;

#[async_trait]
pub trait Relay: Send + Sync {
    /// Pull the relay's current chain
    async fn fetch_chain(&self) -> Result<Chain>;

    /// Publish this node's registry record
    async fn ping(&self, record: &NodeRecord) -> Result<()>;

    /// List node ids the relay currently considers active
    async fn active_nodes(&self) -> Result<ActiveNodes>;

    /// Look up the balance held by a ledger address
    async fn balance(&self, address: &str) -> Result<Balance>;

    /// Ask the relay for this node's ledger address
    async fn assign_address(&self, uid: &str) -> Result<String>;

    /// Publish a tail-digest proof
    async fn submit_proof(&self, proof: &NodeProof) -> Result<()>;
}
