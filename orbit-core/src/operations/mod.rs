pub mod assign_address;
pub mod receive_block;
pub mod rebroadcast;
pub mod register_node;
pub mod send_proof;
pub mod sync_chain;

pub use assign_address::AssignAddressOperation;
pub use receive_block::{
    ReceiveBlockOperation, ReceiveBlockOperationOutcome, ReceiveBlockOperationRequest,
};
pub use rebroadcast::{RebroadcastOperation, RebroadcastOperationOutcome};
pub use register_node::RegisterNodeOperation;
pub use send_proof::{SendProofOperation, SendProofOperationOutcome};
pub use sync_chain::{SyncChainOperation, SyncChainOperationOutcome};
