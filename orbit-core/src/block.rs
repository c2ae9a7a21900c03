use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A single ledger block as exchanged with the relay and peers.
///
/// Only the linkage fields are typed; everything else the relay puts on a
/// block (transactions, validator, fees, ...) is kept verbatim in `payload`
/// so a block survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub hash: String,
    /// Outer `None` means the key was absent; `Some(None)` is an explicit null.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    previous_hash: Option<Option<String>>,
    /// Kept as the sender's number so integer timestamps stay integers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Number>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Block {
    pub fn new(index: u64, hash: impl Into<String>, previous_hash: Option<String>) -> Self {
        Self {
            index,
            hash: hash.into(),
            previous_hash: previous_hash.map(Some),
            timestamp: None,
            payload: Map::new(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    pub fn previous_hash(&self) -> Option<&str> {
        self.previous_hash.as_ref()?.as_deref()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

pub type Chain = Vec<Block>;

/// Returns the first index `> 1` whose `previous_hash` does not match its
/// predecessor's `hash`. The block right after genesis is exempt, matching
/// the acceptance rule in [`crate::validator`].
pub fn first_linkage_violation(chain: &[Block]) -> Option<usize> {
    chain
        .windows(2)
        .enumerate()
        .skip(1)
        .find(|(_, pair)| pair[1].previous_hash() != Some(pair[0].hash.as_str()))
        .map(|(position, _)| position + 1)
}
