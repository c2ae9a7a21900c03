use crate::config::Config;
use crate::stats::StatsReporter;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use orbit_core::{
    ChainStore, HeartbeatEngine, NodeIdentity, NodeRegistry, OrbitError, RebroadcastOperation,
    ReceiveBlockOperation, RegisterNodeOperation, Relay, Result, SendProofOperation,
    SyncChainOperation, SyncEngine,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

mod chain;
mod types;

use chain::{get_chain, health, receive_block};
pub(crate) use types::*;

pub struct ServerState {
    pub(crate) identity: Arc<NodeIdentity>,
    pub(crate) chain_store: Arc<ChainStore>,
    pub(crate) receive_block_operation: Arc<ReceiveBlockOperation>,
}

impl ServerState {
    pub(crate) fn new(identity: Arc<NodeIdentity>, chain_store: Arc<ChainStore>) -> Self {
        Self {
            identity,
            receive_block_operation: Arc::new(ReceiveBlockOperation::new(chain_store.clone())),
            chain_store,
        }
    }
}

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/chain", get(get_chain))
        .route("/receive_block", post(receive_block))
        .route("/health", get(health))
        .with_state(state)
}

/// Opens the local stores, performs the startup sync and registration, spawns
/// the background loops and serves HTTP until ctrl-c.
pub async fn run_server(
    config: Config,
    identity: Arc<NodeIdentity>,
    relay: Arc<dyn Relay>,
) -> Result<()> {
    let data_dir = config.node.data_dir.clone();
    let chain_store = Arc::new(ChainStore::open(&data_dir, identity.node_id()).await?);
    let registry = Arc::new(NodeRegistry::open(&data_dir).await?);
    tracing::info!(
        "Loaded {} blocks and {} node records from {:?}",
        chain_store.len().await,
        registry.len().await,
        data_dir
    );

    let sync_chain_operation = Arc::new(SyncChainOperation::new(
        chain_store.clone(),
        relay.clone(),
    ));
    let register_node_operation = Arc::new(RegisterNodeOperation::new(
        identity.clone(),
        registry.clone(),
        relay.clone(),
        config.relay.fee_collector_address.clone(),
    ));
    let rebroadcast_operation = Arc::new(RebroadcastOperation::new(
        identity.node_id(),
        relay.clone(),
        register_node_operation.clone(),
    ));
    let send_proof_operation = Arc::new(SendProofOperation::new(
        identity.node_id(),
        chain_store.clone(),
        relay.clone(),
    ));

    if let Err(error) = sync_chain_operation.run().await {
        tracing::warn!("Initial chain sync skipped: {}", error);
    }
    if let Err(error) = register_node_operation.run().await {
        tracing::warn!("Initial registration failed: {}", error);
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let sync_engine = SyncEngine::new(sync_chain_operation, config.intervals.sync());
    let heartbeat_engine = HeartbeatEngine::new(
        rebroadcast_operation,
        send_proof_operation,
        config.intervals.heartbeat(),
    );
    let stats_reporter = StatsReporter::new(
        identity.clone(),
        chain_store.clone(),
        registry,
        config.intervals.stats(),
    );

    let background = vec![
        sync_engine.spawn(shutdown_tx.subscribe()),
        heartbeat_engine.spawn_rebroadcast(shutdown_tx.subscribe()),
        heartbeat_engine.spawn_proof(shutdown_tx.subscribe()),
        stats_reporter.spawn(shutdown_tx.subscribe()),
    ];

    let state = Arc::new(ServerState::new(identity.clone(), chain_store));
    let app = router(state);

    let bind_addr = format!("{}:{}", config.node.bind_host, identity.port());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Orbit node {} listening on {}", identity.node_id(), bind_addr);

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx.clone()))
        .await
        .map_err(|error| OrbitError::Http(error.to_string()));

    let _ = shutdown_tx.send(());
    for handle in background {
        if let Err(error) = handle.await {
            tracing::warn!("Background task ended abnormally: {}", error);
        }
    }
    tracing::info!("Orbit node {} stopped", identity.node_id());

    serve_result
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", error);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
    let _ = shutdown_tx.send(());
}

pub(crate) fn response_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
