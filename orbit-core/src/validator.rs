//! Linkage validation and the rolling tail digest.
//!
//! Validation is a linkage check only: block hashes are taken on faith from
//! the sender, and neither timestamps nor payloads are inspected.

use crate::block::Block;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of trailing blocks folded into a proof digest.
pub const PROOF_WINDOW: usize = 10;

/// Decides whether `candidate` may be appended to `chain`.
///
/// An empty chain rejects everything; a chain whose tail is the genesis block
/// accepts anything; otherwise `candidate.previous_hash` must equal the
/// tail's `hash`.
pub fn is_linkable(chain: &[Block], candidate: &Block) -> bool {
    let Some(tail) = chain.last() else {
        return false;
    };

    if tail.is_genesis() {
        return true;
    }

    candidate.previous_hash() == Some(tail.hash.as_str())
}

/// SHA-256 over the concatenated `hash` fields of the last `min(n, len)`
/// blocks, oldest first, hex encoded. An empty input yields the digest of
/// the empty string.
pub fn tail_digest(chain: &[Block], n: usize) -> String {
    let start = chain.len().saturating_sub(n);
    let mut hasher = Sha256::new();
    for block in &chain[start..] {
        hasher.update(block.hash.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Linkage validator carrying the process-local validity counter.
#[derive(Debug, Default)]
pub struct Validator {
    valid: AtomicU64,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs [`is_linkable`]. The counter is left alone; callers bump it with
    /// [`Validator::record_accepted`] once the block is durably appended.
    pub fn validate(&self, chain: &[Block], candidate: &Block) -> bool {
        is_linkable(chain, candidate)
    }

    pub fn record_accepted(&self) {
        self.valid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn valid_count(&self) -> u64 {
        self.valid.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(index: u64, hash: &str, previous: &str) -> Block {
        Block::new(index, hash, Some(previous.to_string()))
    }

    #[test]
    fn test_empty_chain_rejects_everything() {
        let validator = Validator::new();
        assert!(!validator.validate(&[], &Block::new(0, "h0", None)));
        assert!(!validator.validate(&[], &linked(1, "h1", "h0")));
        assert_eq!(validator.valid_count(), 0);
    }

    #[test]
    fn test_genesis_tail_accepts_any_candidate() {
        let chain = vec![Block::new(0, "h0", None)];
        assert!(is_linkable(&chain, &linked(1, "h1", "h0")));
        assert!(is_linkable(&chain, &linked(1, "h1", "unrelated")));
        assert!(is_linkable(&chain, &Block::new(7, "x", None)));
    }

    #[test]
    fn test_linkage_against_tail() {
        let chain = vec![Block::new(0, "h0", None), linked(1, "h1", "h0")];
        assert!(is_linkable(&chain, &linked(2, "h2", "h1")));
        assert!(!is_linkable(&chain, &linked(2, "h2", "h0")));
        assert!(!is_linkable(&chain, &Block::new(2, "h2", None)));
    }

    #[test]
    fn test_validity_counter_scenario() {
        let validator = Validator::new();
        let genesis = Block::new(0, "h0", None);

        assert!(!validator.validate(&[], &genesis));

        let mut chain = vec![genesis];
        let first = linked(1, "h1", "h0");
        assert!(validator.validate(&chain, &first));
        assert_eq!(validator.valid_count(), 0);
        chain.push(first);
        validator.record_accepted();
        assert_eq!(validator.valid_count(), 1);

        assert!(!validator.validate(&chain, &linked(2, "h2", "WRONG")));
        assert_eq!(chain.len(), 2);
        assert_eq!(validator.valid_count(), 1);
    }

    #[test]
    fn test_tail_digest_window() {
        let chain: Vec<Block> = (0..15)
            .map(|i| Block::new(i, format!("h{}", i), None))
            .collect();

        let expected_input: String = (5..15).map(|i| format!("h{}", i)).collect();
        let expected = hex::encode(Sha256::digest(expected_input.as_bytes()));
        assert_eq!(tail_digest(&chain, PROOF_WINDOW), expected);

        // Only the trailing hashes matter.
        let mut other = chain.clone();
        other[0].hash = "changed".to_string();
        other[3].payload.insert("extra".to_string(), serde_json::json!(1));
        assert_eq!(tail_digest(&other, PROOF_WINDOW), expected);

        other[14].hash = "changed".to_string();
        assert_ne!(tail_digest(&other, PROOF_WINDOW), expected);
    }

    #[test]
    fn test_tail_digest_short_and_empty_chain() {
        let chain = vec![Block::new(0, "a", None), Block::new(1, "b", None)];
        assert_eq!(
            tail_digest(&chain, PROOF_WINDOW),
            hex::encode(Sha256::digest(b"ab"))
        );
        assert_eq!(
            tail_digest(&[], PROOF_WINDOW),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
