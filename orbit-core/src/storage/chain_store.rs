use super::{read_json_or_default, write_json_atomic};
use crate::block::{Block, Chain};
use crate::error::Result;
use crate::validator::{self, Validator};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    Accepted { index: u64, chain_len: usize },
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplaceOutcome {
    Replaced { previous_len: usize, new_len: usize },
    Unchanged { local_len: usize, remote_len: usize },
}

/// ChainStore owns this node's replica of the block sequence, persisted as
/// `{data_dir}/orbit_chain.{node_id}.json`.
///
/// Every mutation takes the write lock, updates memory and rewrites the file
/// before releasing it, so readers never see a chain that differs from the
/// last successful write.
pub struct ChainStore {
    path: PathBuf,
    chain: RwLock<Chain>,
    validator: Validator,
}

impl ChainStore {
    pub async fn open(data_dir: impl AsRef<Path>, node_id: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;

        let path = data_dir.join(Self::file_name(node_id));
        let chain: Chain = read_json_or_default(&path).await;
        tracing::info!("Loaded {} blocks from {:?}", chain.len(), path);

        Ok(Self {
            path,
            chain: RwLock::new(chain),
            validator: Validator::new(),
        })
    }

    pub fn file_name(node_id: &str) -> String {
        format!("orbit_chain.{}.json", node_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the persisted chain, replacing the in-memory copy. Missing or
    /// malformed files yield an empty chain.
    pub async fn load(&self) -> usize {
        let mut chain = self.chain.write().await;
        *chain = read_json_or_default(&self.path).await;
        chain.len()
    }

    pub async fn save(&self) -> Result<()> {
        let chain = self.chain.write().await;
        write_json_atomic(&self.path, &*chain).await
    }

    /// Appends `block` if it links onto the current tail. On a persistence
    /// failure the block is taken back out and the error returned; the
    /// validity counter only moves once the write has landed.
    pub async fn append(&self, block: Block) -> Result<AppendOutcome> {
        let mut chain = self.chain.write().await;
        if !self.validator.validate(&chain, &block) {
            return Ok(AppendOutcome::Rejected);
        }

        let index = block.index;
        chain.push(block);
        if let Err(error) = write_json_atomic(&self.path, &*chain).await {
            chain.pop();
            return Err(error);
        }
        self.validator.record_accepted();

        Ok(AppendOutcome::Accepted {
            index,
            chain_len: chain.len(),
        })
    }

    /// Unconditionally substitutes the whole chain. The replacement's
    /// internal linkage is not checked.
    pub async fn replace(&self, remote: Chain) -> Result<()> {
        let mut chain = self.chain.write().await;
        let previous = std::mem::replace(&mut *chain, remote);
        if let Err(error) = write_json_atomic(&self.path, &*chain).await {
            *chain = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Adopts `remote` only when it is strictly longer than the local chain.
    /// Comparison and substitution happen under one write lock.
    pub async fn replace_if_longer(&self, remote: Chain) -> Result<ReplaceOutcome> {
        let mut chain = self.chain.write().await;
        let local_len = chain.len();
        let remote_len = remote.len();
        if remote_len <= local_len {
            return Ok(ReplaceOutcome::Unchanged {
                local_len,
                remote_len,
            });
        }

        let previous = std::mem::replace(&mut *chain, remote);
        if let Err(error) = write_json_atomic(&self.path, &*chain).await {
            *chain = previous;
            return Err(error);
        }

        Ok(ReplaceOutcome::Replaced {
            previous_len: local_len,
            new_len: remote_len,
        })
    }

    pub async fn tail_digest(&self, n: usize) -> String {
        let chain = self.chain.read().await;
        validator::tail_digest(&chain, n)
    }

    /// Latest block hash and tail digest taken from the same view of the
    /// chain, or `None` while the chain is empty.
    pub async fn proof_material(&self, n: usize) -> Option<(String, String)> {
        let chain = self.chain.read().await;
        let latest = chain.last()?.hash.clone();
        Some((latest, validator::tail_digest(&chain, n)))
    }

    pub async fn len(&self) -> usize {
        self.chain.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chain.read().await.is_empty()
    }

    pub async fn last(&self) -> Option<Block> {
        self.chain.read().await.last().cloned()
    }

    pub async fn snapshot(&self) -> Chain {
        self.chain.read().await.clone()
    }

    pub fn valid_count(&self) -> u64 {
        self.validator.valid_count()
    }
}
