//! Orbit Core - chain replication and trust heartbeat for ledger nodes

pub mod block;
pub mod engine;
pub mod error;
pub mod node;
pub mod operations;
pub mod relay;
pub mod storage;
pub mod validator;

pub use block::{Block, Chain, first_linkage_violation};
pub use engine::{HeartbeatEngine, HeartbeatIntervals, SyncEngine};
pub use error::{OrbitError, Result};
pub use node::{LOOPBACK_HOST, NodeIdentity, NodeRecord, generate_node_id, pick_free_port};
pub use operations::*;
pub use relay::{ActiveNodes, Balance, HttpRelay, NodeProof, Relay, RelayBuilder};
pub use storage::{AppendOutcome, ChainStore, NodeRegistry, ReplaceOutcome};
pub use validator::{PROOF_WINDOW, Validator, is_linkable, tail_digest};
