use super::{read_json_or_default, write_json_atomic};
use crate::error::Result;
use crate::node::NodeRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const NODES_FILE_NAME: &str = "nodes.json";

/// Known participants keyed by node id, persisted to `{data_dir}/nodes.json`
/// which is shared by every node running from the same directory.
pub struct NodeRegistry {
    path: PathBuf,
    nodes: RwLock<HashMap<String, NodeRecord>>,
}

impl NodeRegistry {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;

        let path = data_dir.join(NODES_FILE_NAME);
        let nodes: HashMap<String, NodeRecord> = read_json_or_default(&path).await;
        tracing::info!("Loaded {} known nodes from {:?}", nodes.len(), path);

        Ok(Self {
            path,
            nodes: RwLock::new(nodes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> usize {
        let mut nodes = self.nodes.write().await;
        *nodes = read_json_or_default(&self.path).await;
        nodes.len()
    }

    pub async fn save(&self) -> Result<()> {
        let nodes = self.nodes.write().await;
        write_json_atomic(&self.path, &*nodes).await
    }

    /// Inserts or overwrites the record under `record.id` and persists.
    pub async fn upsert(&self, record: NodeRecord) -> Result<()> {
        let mut nodes = self.nodes.write().await;
        let previous = nodes.insert(record.id.clone(), record.clone());
        if let Err(error) = write_json_atomic(&self.path, &*nodes).await {
            match previous {
                Some(previous) => nodes.insert(record.id, previous),
                None => nodes.remove(&record.id),
            };
            return Err(error);
        }
        Ok(())
    }

    pub async fn get(&self, node_id: &str) -> Option<NodeRecord> {
        self.nodes.read().await.get(node_id).cloned()
    }

    pub async fn contains(&self, node_id: &str) -> bool {
        self.nodes.read().await.contains_key(node_id)
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> HashMap<String, NodeRecord> {
        self.nodes.read().await.clone()
    }
}
