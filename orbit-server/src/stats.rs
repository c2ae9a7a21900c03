use orbit_core::{ChainStore, NodeIdentity, NodeRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::interval;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStats {
    pub node_id: String,
    pub port: u16,
    pub trust: f64,
    pub uptime: f64,
    pub valid_blocks: u64,
    pub chain_length: usize,
}

/// Periodically logs a one-line summary of this node's state.
pub struct StatsReporter {
    identity: Arc<NodeIdentity>,
    chain_store: Arc<ChainStore>,
    registry: Arc<NodeRegistry>,
    period: Duration,
}

impl StatsReporter {
    pub fn new(
        identity: Arc<NodeIdentity>,
        chain_store: Arc<ChainStore>,
        registry: Arc<NodeRegistry>,
        period: Duration,
    ) -> Self {
        Self {
            identity,
            chain_store,
            registry,
            period,
        }
    }

    pub async fn collect(&self) -> NodeStats {
        let record = self.registry.get(self.identity.node_id()).await;
        let (trust, uptime) = record
            .map(|record| (record.trust, record.uptime))
            .unwrap_or((0.0, 0.0));

        NodeStats {
            node_id: self.identity.node_id().to_string(),
            port: self.identity.port(),
            trust,
            uptime,
            valid_blocks: self.chain_store.valid_count(),
            chain_length: self.chain_store.len().await,
        }
    }

    #[must_use]
    pub fn spawn(self, mut shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let stats = self.collect().await;
                        tracing::info!(
                            node_id = %stats.node_id,
                            port = stats.port,
                            trust = stats.trust,
                            uptime = stats.uptime,
                            valid_blocks = stats.valid_blocks,
                            chain_length = stats.chain_length,
                            "node stats"
                        );
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("stats reporter shutting down");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::{Block, NodeRecord};

    #[tokio::test]
    async fn test_collect_reads_record_and_chain() {
        let dir = tempfile::tempdir().unwrap();
        let identity = Arc::new(NodeIdentity::new("Node1000", "ORB.OPERATOR", 5100, None));
        let chain_store = Arc::new(ChainStore::open(dir.path(), "Node1000").await.unwrap());
        let registry = Arc::new(NodeRegistry::open(dir.path()).await.unwrap());
        let reporter = StatsReporter::new(
            identity,
            chain_store.clone(),
            registry.clone(),
            Duration::from_secs(60),
        );

        let stats = reporter.collect().await;
        assert_eq!(stats.trust, 0.0);
        assert_eq!(stats.chain_length, 0);

        registry
            .upsert(NodeRecord {
                id: "Node1000".to_string(),
                port: 5100,
                uptime: 1.0,
                trust: 1.0,
                ..NodeRecord::default()
            })
            .await
            .unwrap();
        chain_store
            .replace(vec![Block::new(0, "h0", None)])
            .await
            .unwrap();
        chain_store
            .append(Block::new(1, "h1", Some("h0".to_string())))
            .await
            .unwrap();

        let stats = reporter.collect().await;
        assert_eq!(
            stats,
            NodeStats {
                node_id: "Node1000".to_string(),
                port: 5100,
                trust: 1.0,
                uptime: 1.0,
                valid_blocks: 1,
                chain_length: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_reporter_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let identity = Arc::new(NodeIdentity::new("Node1001", "ORB.OPERATOR", 5101, None));
        let chain_store = Arc::new(ChainStore::open(dir.path(), "Node1001").await.unwrap());
        let registry = Arc::new(NodeRegistry::open(dir.path()).await.unwrap());

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = StatsReporter::new(identity, chain_store, registry, Duration::from_secs(60))
            .spawn(shutdown_rx);

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
